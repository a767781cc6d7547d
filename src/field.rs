use crate::dispatch::Dispatch;
use crate::grid::Grid2;

/// One channel of per-cell state, owned for the lifetime of a simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Field2 {
    grid: Grid2,
    data: Vec<f32>,
}

impl Field2 {
    pub fn new(grid: Grid2, fill: f32) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn zeros(grid: Grid2) -> Self {
        Self::new(grid, 0.0)
    }

    pub fn from_fn(grid: Grid2, f: impl Fn(usize, usize) -> f32) -> Self {
        let width = grid.width();
        let data = (0..grid.size())
            .map(|i| {
                let x = i % width;
                let y = i / width;
                f(x, y)
            })
            .collect();
        Self { grid, data }
    }

    pub fn from_data(grid: Grid2, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), grid.size(), "field data mismatch");
        Self { grid, data }
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.grid.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.grid.idx(x, y);
        self.data[i] = value;
    }

    /// Row-major cell values, `y * W + x`.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Copies `other` into this buffer without reallocating.
    pub fn clone_from(&mut self, other: &Self) {
        self.assert_same_grid(other);
        self.data.copy_from_slice(&other.data);
    }

    pub fn update_with_index(
        &mut self,
        dispatch: Dispatch,
        f: impl Fn(usize, usize, f32) -> f32 + Sync,
    ) {
        let width = self.grid.width();
        dispatch.update_indexed(&mut self.data, width, f);
    }

    pub fn add_scaled_in_place(&mut self, dispatch: Dispatch, other: &Self, scale: f32) {
        self.assert_same_grid(other);
        dispatch.zip_update(&mut self.data, &other.data, |value, other| value + other * scale);
    }

    pub fn sample_clamped(&self, x: i32, y: i32) -> f32 {
        let (cx, cy) = self.grid.clamp_coord(x, y);
        self.get(cx, cy)
    }

    /// Bilinear sample at a position in cell units, clamped to the grid.
    pub fn sample_linear(&self, pos: (f32, f32)) -> f32 {
        let x0 = pos.0.floor() as i32;
        let y0 = pos.1.floor() as i32;
        let x1 = x0 + 1;
        let y1 = y0 + 1;
        let sx = (pos.0 - x0 as f32).clamp(0.0, 1.0);
        let sy = (pos.1 - y0 as f32).clamp(0.0, 1.0);
        let v00 = self.sample_clamped(x0, y0);
        let v10 = self.sample_clamped(x1, y0);
        let v01 = self.sample_clamped(x0, y1);
        let v11 = self.sample_clamped(x1, y1);
        let vx0 = v00 + (v10 - v00) * sx;
        let vx1 = v01 + (v11 - v01) * sx;
        vx0 + (vx1 - vx0) * sy
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Sum over non-wall cells; wall cells only mirror their neighbours.
    pub fn interior_sum(&self) -> f32 {
        let width = self.grid.width();
        let height = self.grid.height();
        self.data
            .chunks_exact(width)
            .skip(1)
            .take(height - 2)
            .map(|row| row[1..width - 1].iter().sum::<f32>())
            .sum()
    }

    pub fn max_abs(&self) -> f32 {
        self.data.iter().map(|value| value.abs()).fold(0.0_f32, f32::max)
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self.data.iter().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        let mut min_value = *first;
        let mut max_value = *first;
        for value in iter {
            if *value < min_value {
                min_value = *value;
            }
            if *value > max_value {
                max_value = *value;
            }
        }
        (min_value, max_value)
    }

    fn assert_same_grid(&self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn new_field_is_zeroed() {
        let field = Field2::zeros(Grid2::new(4, 3));
        assert!(field.data().iter().all(|value| *value == 0.0));
        assert_eq!(field.data().len(), 12);
    }

    #[test]
    fn from_fn_maps_coords() {
        let grid = Grid2::new(3, 4);
        let field = Field2::from_fn(grid, |x, y| (x + y * 10) as f32);
        assert_close(field.get(2, 1), 12.0, 1e-6);
        assert_close(field.get(0, 3), 30.0, 1e-6);
    }

    #[test]
    fn from_data_is_row_major() {
        let grid = Grid2::new(3, 3);
        let field = Field2::from_data(grid, (0..9).map(|i| i as f32).collect());
        assert_close(field.get(2, 0), 2.0, 0.0);
        assert_close(field.get(0, 2), 6.0, 0.0);
    }

    #[test]
    fn set_then_get_roundtrips_single_cell() {
        let mut field = Field2::zeros(Grid2::new(5, 5));
        field.set(3, 1, 7.5);
        assert_close(field.get(3, 1), 7.5, 0.0);
        assert_close(field.sum(), 7.5, 0.0);
    }

    #[test]
    fn sample_linear_hits_cells_and_midpoints() {
        let grid = Grid2::new(3, 3);
        let field = Field2::from_fn(grid, |x, y| (x + y * 3) as f32);
        assert_close(field.sample_linear((1.0, 2.0)), 7.0, 1e-6);
        assert_close(field.sample_linear((0.5, 0.0)), 0.5, 1e-6);
        assert_close(field.sample_linear((1.5, 1.5)), 6.0, 1e-6);
        assert_close(field.sample_linear((-3.0, 9.0)), 6.0, 1e-6);
    }

    #[test]
    fn add_scaled_in_place_accumulates() {
        let grid = Grid2::new(3, 3);
        let mut a = Field2::new(grid, 1.0);
        let b = Field2::from_fn(grid, |x, _y| x as f32);
        a.add_scaled_in_place(Dispatch::Serial, &b, 0.5);
        assert_close(a.get(0, 0), 1.0, 1e-6);
        assert_close(a.get(2, 2), 2.0, 1e-6);
    }

    #[test]
    fn interior_sum_skips_walls() {
        let grid = Grid2::new(4, 5);
        let field = Field2::new(grid, 1.0);
        assert_close(field.interior_sum(), 6.0, 1e-6);
        assert_close(field.sum(), 20.0, 1e-6);
    }

    #[test]
    fn min_max_ignores_non_finite() {
        let grid = Grid2::new(3, 3);
        let mut field = Field2::from_fn(grid, |x, y| (x + y * 3) as f32 - 1.0);
        field.set(1, 1, f32::NAN);
        let (min_value, max_value) = field.min_max();
        assert_close(min_value, -1.0, 1e-6);
        assert_close(max_value, 7.0, 1e-6);
    }

    #[test]
    #[should_panic(expected = "field grid mismatch")]
    fn clone_from_rejects_other_grid() {
        let mut a = Field2::zeros(Grid2::new(3, 3));
        let b = Field2::zeros(Grid2::new(4, 3));
        a.clone_from(&b);
    }
}
