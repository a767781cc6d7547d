use crate::{
    add_source, advect, diffuse, max_divergence, project, Channel, Dispatch, Field2, Grid2,
    ProjectionScratch, SimError, SourceEvent, Sources, Vec2, VecField2,
};

/// When the velocity step removes divergence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    /// Cheaper, softer flow that is allowed to compress.
    Disabled,
    /// Once, after velocity advection.
    #[default]
    AfterAdvection,
    /// After velocity diffusion and again after advection.
    AfterEachStage,
}

/// Construction-time settings; fixed for the lifetime of a simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    /// Density diffusion rate.
    pub diffusion: f32,
    /// Velocity diffusion rate.
    pub viscosity: f32,
    /// Jacobi sweeps per diffusion and per pressure solve.
    pub iterations: usize,
    pub projection: Projection,
    pub dispatch: Dispatch,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            diffusion: 0.0001,
            viscosity: 0.0001,
            iterations: 20,
            projection: Projection::AfterAdvection,
            dispatch: Dispatch::Auto,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width < Grid2::MIN_DIM || self.height < Grid2::MIN_DIM {
            return Err(SimError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.iterations == 0 {
            return Err(SimError::InvalidIterations);
        }
        check_rate("diffusion", self.diffusion)?;
        check_rate("viscosity", self.viscosity)?;
        Ok(())
    }
}

fn check_rate(name: &'static str, value: f32) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRate { name, value })
    }
}

fn check_dt(dt: f32) -> Result<(), SimError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTimestep(dt))
    }
}

/// Everything carried from one frame to the next.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidState {
    pub velocity: VecField2,
    pub density: Field2,
}

impl FluidState {
    pub fn new(grid: Grid2) -> Self {
        Self {
            velocity: VecField2::new(grid, Vec2::ZERO),
            density: Field2::zeros(grid),
        }
    }
}

/// Pre-step copies and solver buffers; contents only mean something
/// inside the step that wrote them.
#[derive(Clone, Debug)]
struct Workspace {
    velocity_before: VecField2,
    density_before: Field2,
    sweep: Field2,
    projection: ProjectionScratch,
}

impl Workspace {
    fn new(grid: Grid2) -> Self {
        Self {
            velocity_before: VecField2::new(grid, Vec2::ZERO),
            density_before: Field2::zeros(grid),
            sweep: Field2::zeros(grid),
            projection: ProjectionScratch::new(grid),
        }
    }
}

/// A stable-fluids simulation on a fixed grid.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: Grid2,
    state: FluidState,
    sources: Sources,
    workspace: Workspace,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = Grid2::new(config.width, config.height);
        log::debug!(
            "fluid simulation {}x{}: diffusion {}, viscosity {}, {} sweeps, {:?}, {:?}",
            config.width,
            config.height,
            config.diffusion,
            config.viscosity,
            config.iterations,
            config.projection,
            config.dispatch
        );
        Ok(Self {
            config,
            grid,
            state: FluidState::new(grid),
            sources: Sources::new(grid),
            workspace: Workspace::new(grid),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn state(&self) -> &FluidState {
        &self.state
    }

    pub fn density(&self) -> &Field2 {
        &self.state.density
    }

    pub fn density_mut(&mut self) -> &mut Field2 {
        &mut self.state.density
    }

    /// Owned copy of the density, for a consumer on another thread.
    pub fn density_snapshot(&self) -> Field2 {
        self.state.density.clone()
    }

    pub fn velocity(&self) -> &VecField2 {
        &self.state.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut VecField2 {
        &mut self.state.velocity
    }

    pub fn sources_mut(&mut self) -> &mut Sources {
        &mut self.sources
    }

    /// Queues an emitter for the next step; returns the cell written.
    pub fn push_source(&mut self, event: SourceEvent) -> (usize, usize) {
        self.sources.apply(event)
    }

    pub fn sample_density(&self, pos: (f32, f32)) -> f32 {
        self.state.density.sample_linear(pos)
    }

    pub fn sample_velocity(&self, pos: (f32, f32)) -> Vec2 {
        self.state.velocity.sample_linear(pos)
    }

    /// Density summed over the interior cells.
    pub fn total_density(&self) -> f32 {
        self.state.density.interior_sum()
    }

    pub fn max_divergence(&self) -> f32 {
        max_divergence(&self.state.velocity)
    }

    pub fn max_speed(&self) -> f32 {
        self.state.velocity.max_speed()
    }

    /// Zeroes fields and pending sources, keeping every allocation.
    pub fn clear(&mut self) {
        self.state.velocity.fill(Vec2::ZERO);
        self.state.density.fill(0.0);
        self.sources.clear_velocity();
        self.sources.clear_density();
    }

    /// One frame: the velocity step, then the density step.
    pub fn step(&mut self, dt: f32) -> Result<(), SimError> {
        self.velocity_step(dt)?;
        self.density_step(dt)
    }

    /// Sources, viscous diffusion, self-advection and (optionally)
    /// projection of the velocity field. Consumes the velocity sources.
    pub fn velocity_step(&mut self, dt: f32) -> Result<(), SimError> {
        check_dt(dt)?;
        log::trace!("velocity step dt={dt} projection={:?}", self.config.projection);
        let SimConfig {
            viscosity,
            iterations,
            projection,
            dispatch,
            ..
        } = self.config;
        let ws = &mut self.workspace;
        let velocity = &mut self.state.velocity;

        add_source(velocity.u_mut(), self.sources.velocity().u(), dt, dispatch);
        add_source(velocity.v_mut(), self.sources.velocity().v(), dt, dispatch);

        ws.velocity_before.clone_from(velocity);
        diffuse(
            velocity.u_mut(),
            ws.velocity_before.u(),
            Channel::VelocityX.reflect(),
            viscosity,
            dt,
            iterations,
            &mut ws.sweep,
            dispatch,
        );
        diffuse(
            velocity.v_mut(),
            ws.velocity_before.v(),
            Channel::VelocityY.reflect(),
            viscosity,
            dt,
            iterations,
            &mut ws.sweep,
            dispatch,
        );
        if projection == Projection::AfterEachStage {
            project(velocity, &mut ws.projection, iterations, dispatch);
        }

        ws.velocity_before.clone_from(velocity);
        let before = &ws.velocity_before;
        advect(
            velocity.u_mut(),
            before.u(),
            before,
            Channel::VelocityX.reflect(),
            dt,
            dispatch,
        );
        advect(
            velocity.v_mut(),
            before.v(),
            before,
            Channel::VelocityY.reflect(),
            dt,
            dispatch,
        );
        if projection != Projection::Disabled {
            project(velocity, &mut ws.projection, iterations, dispatch);
        }

        self.sources.clear_velocity();
        Ok(())
    }

    /// Sources, diffusion and advection of density along the current
    /// velocity. Consumes the density source.
    pub fn density_step(&mut self, dt: f32) -> Result<(), SimError> {
        check_dt(dt)?;
        log::trace!("density step dt={dt}");
        let SimConfig {
            diffusion,
            iterations,
            dispatch,
            ..
        } = self.config;
        let ws = &mut self.workspace;
        let density = &mut self.state.density;
        let reflect = Channel::Density.reflect();

        add_source(density, self.sources.density(), dt, dispatch);

        ws.density_before.clone_from(density);
        diffuse(
            density,
            &ws.density_before,
            reflect,
            diffusion,
            dt,
            iterations,
            &mut ws.sweep,
            dispatch,
        );

        ws.density_before.clone_from(density);
        advect(
            density,
            &ws.density_before,
            &self.state.velocity,
            reflect,
            dt,
            dispatch,
        );

        self.sources.clear_density();
        Ok(())
    }
}
