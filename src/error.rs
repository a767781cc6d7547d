//! Solver error types.

use thiserror::Error;

/// Errors reported by simulation construction and stepping.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimError {
    /// Grid is too small to hold an interior cell surrounded by walls.
    #[error("grid must be at least 3x3, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Relaxation needs at least one sweep.
    #[error("relaxation iteration count must be > 0")]
    InvalidIterations,

    /// Diffusion or viscosity rate is negative or not finite.
    #[error("{name} must be finite and >= 0, got {value}")]
    InvalidRate { name: &'static str, value: f32 },

    /// Time step is negative or not finite.
    #[error("time step must be finite and >= 0, got {0}")]
    InvalidTimestep(f32),
}
