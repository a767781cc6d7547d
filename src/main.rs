use anyhow::{Context, Result};
use stable_fluids::{Channel, Field2, Projection, SimConfig, Simulation, SourceEvent, Vec2};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const FRAMES: usize = 240;
const MAX_FRAME_TIME: f32 = 1.0 / 30.0;
const DENSITY_RATE: f32 = 4000.0;
const FORCE_GAIN: f32 = 40.0;

/// Stands in for a mouse dragged in a circle around the grid centre.
#[derive(Clone, Copy, Debug)]
struct Pointer {
    centre: Vec2,
    radius: f32,
    angular_speed: f32,
    position: Vec2,
}

impl Pointer {
    fn new(width: usize, height: usize) -> Self {
        let centre = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
        let radius = width.min(height) as f32 * 0.3;
        Self {
            centre,
            radius,
            angular_speed: 2.5,
            position: centre + Vec2::new(radius, 0.0),
        }
    }

    /// Advances the pointer and returns its displacement.
    fn advance(&mut self, time: f32) -> Vec2 {
        let angle = time * self.angular_speed;
        let next = self.centre + Vec2::new(angle.cos(), angle.sin()) * self.radius;
        let delta = next - self.position;
        self.position = next;
        delta
    }

    fn emit(&self, sim: &mut Simulation, delta: Vec2) {
        let x = self.position.x.round() as i32;
        let y = self.position.y.round() as i32;
        let force = delta * FORCE_GAIN;
        sim.push_source(SourceEvent::new(x, y, Channel::Density, DENSITY_RATE));
        sim.push_source(SourceEvent::new(x, y, Channel::VelocityX, force.x));
        sim.push_source(SourceEvent::new(x, y, Channel::VelocityY, force.y));
    }
}

fn density_to_luma(density: &Field2, out: &mut Vec<u8>) {
    let grid = density.grid();
    let width = grid.width();
    let height = grid.height();
    out.resize(width * height, 0);
    for y in 0..height {
        for x in 0..width {
            let value = density.get(x, y);
            let c = value.clamp(0.0, 255.0) as u8;
            out[y * width + x] = c;
        }
    }
}

fn write_pgm(path: &Path, width: usize, height: usize, luma: &[u8]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "P5\n{width} {height}\n255\n")?;
    out.write_all(luma)?;
    out.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("density.pgm"));

    let config = SimConfig {
        width: 128,
        height: 128,
        diffusion: 0.00001,
        viscosity: 0.00001,
        iterations: 20,
        projection: Projection::AfterAdvection,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config).context("building simulation")?;
    let mut pointer = Pointer::new(config.width, config.height);

    let started = Instant::now();
    let mut last = started;
    let mut sim_time = 0.0_f32;
    let mut solver_time = Duration::ZERO;
    for frame in 0..FRAMES {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32().min(MAX_FRAME_TIME);
        last = now;
        sim_time += dt;

        let delta = pointer.advance(sim_time);
        pointer.emit(&mut sim, delta);

        let tick = Instant::now();
        sim.step(dt)?;
        solver_time += tick.elapsed();

        if frame % 30 == 0 {
            let (min_value, max_value) = sim.density().min_max();
            log::info!(
                "frame {frame}: dt {dt:.4}, density total {:.1} range [{min_value:.2}, {max_value:.2}], max speed {:.3}, max divergence {:.2e}",
                sim.total_density(),
                sim.max_speed(),
                sim.max_divergence()
            );
        }
    }
    log::info!(
        "{FRAMES} frames in {:.2?} ({:.2?} solving)",
        started.elapsed(),
        solver_time
    );

    let snapshot = sim.density_snapshot();
    let mut luma = Vec::new();
    density_to_luma(&snapshot, &mut luma);
    write_pgm(&output, config.width, config.height, &luma)?;
    log::info!("wrote {}", output.display());
    Ok(())
}
