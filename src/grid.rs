/// Cell layout shared by every field of a simulation.
///
/// Cells with `x` in `{0, W-1}` or `y` in `{0, H-1}` are walls; everything
/// else is interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid2 {
    width: usize,
    height: usize,
}

impl Grid2 {
    pub const MIN_DIM: usize = 3;

    pub fn new(width: usize, height: usize) -> Self {
        assert!(width >= Self::MIN_DIM, "width must be >= 3");
        assert!(height >= Self::MIN_DIM, "height must be >= 3");
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Cell spacing `(hx, hy)` of the unit square mapped onto the grid.
    pub fn spacing(&self) -> (f32, f32) {
        (1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn is_boundary(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    pub fn clamp_coord(&self, x: i32, y: i32) -> (usize, usize) {
        let max_x = (self.width - 1) as i32;
        let max_y = (self.height - 1) as i32;
        let cx = x.clamp(0, max_x) as usize;
        let cy = y.clamp(0, max_y) as usize;
        (cx, cy)
    }

    /// Clamps a possibly off-grid coordinate into `[1, W-2] x [1, H-2]`.
    pub fn clamp_interior(&self, x: i32, y: i32) -> (usize, usize) {
        let max_x = (self.width - 2) as i32;
        let max_y = (self.height - 2) as i32;
        let cx = x.clamp(1, max_x) as usize;
        let cy = y.clamp(1, max_y) as usize;
        (cx, cy)
    }
}
