use crate::{Field2, Grid2, Vec2};

/// Velocity as two collocated channels, `u` along x and `v` along y.
#[derive(Clone, Debug, PartialEq)]
pub struct VecField2 {
    u: Field2,
    v: Field2,
}

impl VecField2 {
    pub fn new(grid: Grid2, fill: Vec2) -> Self {
        Self {
            u: Field2::new(grid, fill.x),
            v: Field2::new(grid, fill.y),
        }
    }

    pub fn from_fn(grid: Grid2, f: impl Fn(usize, usize) -> Vec2) -> Self {
        let u = Field2::from_fn(grid, |x, y| f(x, y).x);
        let v = Field2::from_fn(grid, |x, y| f(x, y).y);
        Self { u, v }
    }

    pub fn grid(&self) -> Grid2 {
        self.u.grid()
    }

    pub fn get(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(self.u.get(x, y), self.v.get(x, y))
    }

    pub fn set(&mut self, x: usize, y: usize, value: Vec2) {
        self.u.set(x, y, value.x);
        self.v.set(x, y, value.y);
    }

    pub fn u(&self) -> &Field2 {
        &self.u
    }

    pub fn v(&self) -> &Field2 {
        &self.v
    }

    pub fn u_mut(&mut self) -> &mut Field2 {
        &mut self.u
    }

    pub fn v_mut(&mut self) -> &mut Field2 {
        &mut self.v
    }

    /// Both channels mutably at once, for passes that write `u` and `v`.
    pub fn split_mut(&mut self) -> (&mut Field2, &mut Field2) {
        (&mut self.u, &mut self.v)
    }

    pub fn clone_from(&mut self, other: &Self) {
        self.u.clone_from(&other.u);
        self.v.clone_from(&other.v);
    }

    pub fn fill(&mut self, value: Vec2) {
        self.u.fill(value.x);
        self.v.fill(value.y);
    }

    pub fn sample_linear(&self, pos: (f32, f32)) -> Vec2 {
        Vec2::new(self.u.sample_linear(pos), self.v.sample_linear(pos))
    }

    /// Largest cell speed.
    pub fn max_speed(&self) -> f32 {
        self.u
            .data()
            .iter()
            .zip(self.v.data().iter())
            .map(|(u, v)| Vec2::new(*u, *v).length())
            .fold(0.0_f32, f32::max)
    }
}
