//! External emitters and their injection into the live fields.

use crate::{Dispatch, Field2, Grid2, Reflect, Vec2, VecField2};

/// A simulated quantity a source event can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    VelocityX,
    VelocityY,
    Density,
}

impl Channel {
    /// Wall rule for this channel.
    pub fn reflect(self) -> Reflect {
        match self {
            Channel::VelocityX => Reflect::LeftRight,
            Channel::VelocityY => Reflect::TopBottom,
            Channel::Density => Reflect::None,
        }
    }
}

/// One emitter write, in quantity per unit time, at a grid cell.
///
/// Coordinates are signed so pointer input that drifts past the window
/// edge can be passed through as-is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceEvent {
    pub x: i32,
    pub y: i32,
    pub channel: Channel,
    pub magnitude: f32,
}

impl SourceEvent {
    pub fn new(x: i32, y: i32, channel: Channel, magnitude: f32) -> Self {
        Self {
            x,
            y,
            channel,
            magnitude,
        }
    }
}

/// Emission rates waiting to be consumed by the next step.
#[derive(Clone, Debug, PartialEq)]
pub struct Sources {
    velocity: VecField2,
    density: Field2,
}

impl Sources {
    pub fn new(grid: Grid2) -> Self {
        Self {
            velocity: VecField2::new(grid, Vec2::ZERO),
            density: Field2::zeros(grid),
        }
    }

    pub fn velocity(&self) -> &VecField2 {
        &self.velocity
    }

    pub fn density(&self) -> &Field2 {
        &self.density
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut Field2 {
        match channel {
            Channel::VelocityX => self.velocity.u_mut(),
            Channel::VelocityY => self.velocity.v_mut(),
            Channel::Density => &mut self.density,
        }
    }

    /// Sets the rate at the event's cell, clamped into the interior.
    ///
    /// Returns the cell that was written.
    pub fn apply(&mut self, event: SourceEvent) -> (usize, usize) {
        let grid = self.density.grid();
        let (x, y) = grid.clamp_interior(event.x, event.y);
        if (x as i32, y as i32) != (event.x, event.y) {
            log::debug!(
                "source event at ({}, {}) clamped to ({x}, {y})",
                event.x,
                event.y
            );
        }
        self.channel_mut(event.channel).set(x, y, event.magnitude);
        (x, y)
    }

    pub fn clear_velocity(&mut self) {
        self.velocity.fill(Vec2::ZERO);
    }

    pub fn clear_density(&mut self) {
        self.density.fill(0.0);
    }
}

/// `field += source * dt`, cell by cell, walls included.
pub fn add_source(field: &mut Field2, source: &Field2, dt: f32, dispatch: Dispatch) {
    field.add_scaled_in_place(dispatch, source, dt);
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
    fn add_source_scales_by_dt() {
        let grid = Grid2::new(4, 4);
        let mut field = Field2::new(grid, 1.0);
        let source = Field2::from_fn(grid, |x, y| if (x, y) == (2, 1) { 10.0 } else { 0.0 });
        add_source(&mut field, &source, 0.25, Dispatch::Serial);
        assert_close(field.get(2, 1), 3.5, 1e-6);
        assert_close(field.get(1, 2), 1.0, 0.0);
    }

    #[test]
    fn add_source_reaches_wall_cells() {
        let grid = Grid2::new(3, 3);
        let mut field = Field2::zeros(grid);
        let source = Field2::new(grid, 2.0);
        add_source(&mut field, &source, 0.5, Dispatch::Parallel);
        assert!(field.data().iter().all(|value| *value == 1.0));
    }

    #[test]
    fn apply_writes_requested_channel() {
        let grid = Grid2::new(6, 6);
        let mut sources = Sources::new(grid);
        let cell = sources.apply(SourceEvent::new(3, 2, Channel::VelocityY, -4.0));
        assert_eq!(cell, (3, 2));
        assert_close(sources.velocity().v().get(3, 2), -4.0, 0.0);
        assert_close(sources.velocity().u().get(3, 2), 0.0, 0.0);
        assert_close(sources.density().sum(), 0.0, 0.0);
    }

    #[test]
    fn apply_sets_rather_than_accumulates() {
        let grid = Grid2::new(5, 5);
        let mut sources = Sources::new(grid);
        sources.apply(SourceEvent::new(2, 2, Channel::Density, 5.0));
        sources.apply(SourceEvent::new(2, 2, Channel::Density, 8.0));
        assert_close(sources.density().get(2, 2), 8.0, 0.0);
    }

    #[test]
    fn apply_clamps_off_grid_events_into_interior() {
        let grid = Grid2::new(8, 6);
        let mut sources = Sources::new(grid);
        assert_eq!(
            sources.apply(SourceEvent::new(-20, 40, Channel::Density, 1.0)),
            (1, 4)
        );
        assert_eq!(
            sources.apply(SourceEvent::new(7, 0, Channel::VelocityX, 1.0)),
            (6, 1)
        );
        assert_close(sources.density().get(1, 4), 1.0, 0.0);
        assert_close(sources.velocity().u().get(6, 1), 1.0, 0.0);
    }

    #[test]
    fn clear_only_resets_its_channels() {
        let grid = Grid2::new(4, 4);
        let mut sources = Sources::new(grid);
        sources.apply(SourceEvent::new(1, 1, Channel::Density, 3.0));
        sources.apply(SourceEvent::new(2, 2, Channel::VelocityX, 3.0));
        sources.clear_velocity();
        assert_close(sources.velocity().max_speed(), 0.0, 0.0);
        assert_close(sources.density().get(1, 1), 3.0, 0.0);
        sources.clear_density();
        assert_close(sources.density().sum(), 0.0, 0.0);
    }

    #[test]
    fn channel_reflect_matches_wall_normals() {
        assert_eq!(Channel::VelocityX.reflect(), Reflect::LeftRight);
        assert_eq!(Channel::VelocityY.reflect(), Reflect::TopBottom);
        assert_eq!(Channel::Density.reflect(), Reflect::None);
    }
}
