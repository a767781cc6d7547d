mod advect;
mod boundary;
mod diffuse;
mod dispatch;
mod error;
mod field;
mod grid;
mod project;
mod sim;
mod source;
mod vec2;
mod vec_field;

pub use advect::advect;
pub use boundary::{enforce_boundary, Reflect};
pub use diffuse::diffuse;
pub use dispatch::Dispatch;
pub use error::SimError;
pub use field::Field2;
pub use grid::Grid2;
pub use project::{divergence_into, max_divergence, project, ProjectionScratch};
pub use sim::{FluidState, Projection, SimConfig, Simulation};
pub use source::{add_source, Channel, SourceEvent, Sources};
pub use vec2::Vec2;
pub use vec_field::VecField2;
