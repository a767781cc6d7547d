//! Semi-Lagrangian transport along the velocity field.

use crate::{enforce_boundary, Dispatch, Field2, Reflect, VecField2};

/// Sets each interior cell of `field` to the value of `before` at the
/// point the flow carried into that cell over `dt`.
///
/// Back-traced positions are clamped to `[0.5, W-1.5] x [0.5, H-1.5]` so
/// the four bilinear taps always land on the grid.
pub fn advect(
    field: &mut Field2,
    before: &Field2,
    velocity: &VecField2,
    reflect: Reflect,
    dt: f32,
    dispatch: Dispatch,
) {
    let grid = field.grid();
    let width = grid.width() as f32;
    let height = grid.height() as f32;
    let dt_x = dt * width;
    let dt_y = dt * height;
    let max_x = width - 1.5;
    let max_y = height - 1.5;
    let u = velocity.u();
    let v = velocity.v();

    field.update_with_index(dispatch, |i, j, value| {
        if grid.is_boundary(i, j) {
            return value;
        }
        let x = (i as f32 - dt_x * u.get(i, j)).clamp(0.5, max_x);
        let y = (j as f32 - dt_y * v.get(i, j)).clamp(0.5, max_y);

        let i0 = x.floor() as usize;
        let i1 = i0 + 1;
        let j0 = y.floor() as usize;
        let j1 = j0 + 1;

        let s1 = x - i0 as f32;
        let s0 = 1.0 - s1;
        let t1 = y - j0 as f32;
        let t0 = 1.0 - t1;

        s0 * (t0 * before.get(i0, j0) + t1 * before.get(i0, j1))
            + s1 * (t0 * before.get(i1, j0) + t1 * before.get(i1, j1))
    });

    enforce_boundary(field, reflect);
}
