//! Pressure projection onto an (approximately) divergence-free velocity.

use crate::diffuse::relax;
use crate::{enforce_boundary, Dispatch, Field2, Grid2, Reflect, VecField2};

/// Buffers reused by every projection.
#[derive(Clone, Debug)]
pub struct ProjectionScratch {
    pub pressure: Field2,
    pub divergence: Field2,
    sweep: Field2,
}

impl ProjectionScratch {
    pub fn new(grid: Grid2) -> Self {
        Self {
            pressure: Field2::zeros(grid),
            divergence: Field2::zeros(grid),
            sweep: Field2::zeros(grid),
        }
    }
}

/// Writes the scaled negative divergence of `velocity` into `out`.
///
/// Interior cells get `-0.5*hy*(u[x+1]-u[x-1]) - 0.5*hx*(v[y+1]-v[y-1])`;
/// wall cells are zero.
pub fn divergence_into(out: &mut Field2, velocity: &VecField2, dispatch: Dispatch) {
    let grid = velocity.grid();
    let (hx, hy) = grid.spacing();
    let u = velocity.u();
    let v = velocity.v();
    out.update_with_index(dispatch, |x, y, _| {
        if grid.is_boundary(x, y) {
            return 0.0;
        }
        -0.5 * hy * (u.get(x + 1, y) - u.get(x - 1, y))
            - 0.5 * hx * (v.get(x, y + 1) - v.get(x, y - 1))
    });
}

/// Largest interior divergence magnitude of `velocity`.
pub fn max_divergence(velocity: &VecField2) -> f32 {
    let mut div = Field2::zeros(velocity.grid());
    divergence_into(&mut div, velocity, Dispatch::Auto);
    div.max_abs()
}

/// Removes the divergent part of `velocity`.
///
/// Solves `∇²p = div` with `iterations` Jacobi sweeps starting from
/// zero pressure, subtracts `∇p`, then re-applies the velocity walls.
pub fn project(
    velocity: &mut VecField2,
    scratch: &mut ProjectionScratch,
    iterations: usize,
    dispatch: Dispatch,
) {
    let grid = velocity.grid();
    let (hx, hy) = grid.spacing();
    let ProjectionScratch {
        pressure,
        divergence,
        sweep,
    } = scratch;

    divergence_into(divergence, velocity, dispatch);
    enforce_boundary(divergence, Reflect::None);
    pressure.fill(0.0);

    relax(
        pressure,
        divergence,
        1.0,
        4.0,
        Reflect::None,
        iterations,
        sweep,
        dispatch,
    );

    let p = &*pressure;
    let (u, v) = velocity.split_mut();
    u.update_with_index(dispatch, |x, y, value| {
        if grid.is_boundary(x, y) {
            return value;
        }
        value - 0.5 * (p.get(x + 1, y) - p.get(x - 1, y)) / hx
    });
    v.update_with_index(dispatch, |x, y, value| {
        if grid.is_boundary(x, y) {
            return value;
        }
        value - 0.5 * (p.get(x, y + 1) - p.get(x, y - 1)) / hy
    });

    enforce_boundary(u, Reflect::LeftRight);
    enforce_boundary(v, Reflect::TopBottom);
}
