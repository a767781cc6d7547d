//! Implicit diffusion by fixed-count Jacobi relaxation.

use crate::{enforce_boundary, Dispatch, Field2, Reflect};

/// Relaxes `field` toward the solution of `(I - a∇²) field = before`.
///
/// `a = dt * rate * W * H`. `field` is the initial guess and holds the
/// result; `scratch` receives each sweep's input so no sweep reads a
/// neighbour it has already rewritten.
#[allow(clippy::too_many_arguments)]
pub fn diffuse(
    field: &mut Field2,
    before: &Field2,
    reflect: Reflect,
    rate: f32,
    dt: f32,
    iterations: usize,
    scratch: &mut Field2,
    dispatch: Dispatch,
) {
    let grid = field.grid();
    let a = dt * rate * (grid.width() * grid.height()) as f32;
    if a == 0.0 {
        field.clone_from(before);
        enforce_boundary(field, reflect);
        return;
    }
    relax(field, before, a, 1.0 + 4.0 * a, reflect, iterations, scratch, dispatch);
}

/// Jacobi sweeps of `x = (rhs + a * Σ neighbours(x)) / c` over interior
/// cells, with walls enforced after every sweep.
#[allow(clippy::too_many_arguments)]
pub(crate) fn relax(
    field: &mut Field2,
    rhs: &Field2,
    a: f32,
    c: f32,
    reflect: Reflect,
    iterations: usize,
    scratch: &mut Field2,
    dispatch: Dispatch,
) {
    let grid = field.grid();
    for _ in 0..iterations {
        scratch.clone_from(field);
        let prev = &*scratch;
        field.update_with_index(dispatch, |x, y, value| {
            if grid.is_boundary(x, y) {
                return value;
            }
            let neighbours =
                prev.get(x - 1, y) + prev.get(x + 1, y) + prev.get(x, y - 1) + prev.get(x, y + 1);
            (rhs.get(x, y) + a * neighbours) / c
        });
        enforce_boundary(field, reflect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid2;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn spike(grid: Grid2, x: usize, y: usize, value: f32) -> Field2 {
        let mut field = Field2::zeros(grid);
        field.set(x, y, value);
        field
    }

    #[test]
    fn uniform_field_is_a_fixed_point() {
        let grid = Grid2::new(6, 5);
        let before = Field2::new(grid, 2.5);
        let mut field = before.clone();
        let mut scratch = Field2::zeros(grid);
        diffuse(
            &mut field,
            &before,
            Reflect::None,
            0.25,
            0.5,
            20,
            &mut scratch,
            Dispatch::Serial,
        );
        for value in field.data() {
            assert_close(*value, 2.5, 1e-5);
        }
    }

    #[test]
    fn spike_spreads_to_neighbours_and_keeps_mass() {
        let grid = Grid2::new(9, 9);
        let before = spike(grid, 4, 4, 50.0);
        let mut field = before.clone();
        let mut scratch = Field2::zeros(grid);
        diffuse(
            &mut field,
            &before,
            Reflect::None,
            0.1,
            0.1,
            20,
            &mut scratch,
            Dispatch::Serial,
        );
        assert!(field.get(4, 4) < 50.0);
        assert!(field.get(3, 4) > 0.0);
        assert!(field.get(3, 4) > field.get(3, 3));
        assert_close(field.interior_sum(), 50.0, 1e-3);
    }

    #[test]
    fn zero_rate_copies_snapshot() {
        let grid = Grid2::new(5, 5);
        let before = Field2::from_fn(grid, |x, y| (x * y) as f32);
        let mut field = Field2::zeros(grid);
        let mut scratch = Field2::zeros(grid);
        diffuse(
            &mut field,
            &before,
            Reflect::None,
            0.0,
            0.1,
            20,
            &mut scratch,
            Dispatch::Serial,
        );
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(field.get(x, y), before.get(x, y));
            }
        }
        assert_eq!(field.get(0, 2), field.get(1, 2));
    }

    #[test]
    fn sweeps_do_not_depend_on_dispatch() {
        let grid = Grid2::new(12, 7);
        let before = Field2::from_fn(grid, |x, y| ((x * 31 + y * 17) % 9) as f32);
        let mut serial = before.clone();
        let mut parallel = before.clone();
        let mut scratch = Field2::zeros(grid);
        diffuse(
            &mut serial,
            &before,
            Reflect::LeftRight,
            0.3,
            0.05,
            20,
            &mut scratch,
            Dispatch::Serial,
        );
        diffuse(
            &mut parallel,
            &before,
            Reflect::LeftRight,
            0.3,
            0.05,
            20,
            &mut scratch,
            Dispatch::Parallel,
        );
        assert_eq!(serial, parallel);
    }

    #[test]
    fn reflected_walls_hold_after_relaxation() {
        let grid = Grid2::new(6, 6);
        let before = Field2::from_fn(grid, |x, _y| x as f32 - 2.0);
        let mut field = before.clone();
        let mut scratch = Field2::zeros(grid);
        diffuse(
            &mut field,
            &before,
            Reflect::LeftRight,
            0.2,
            0.1,
            3,
            &mut scratch,
            Dispatch::Serial,
        );
        for y in 1..5 {
            assert_eq!(field.get(0, y), -field.get(1, y));
            assert_eq!(field.get(5, y), -field.get(4, y));
        }
    }
}
