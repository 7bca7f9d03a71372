use crate::World;
use crate::config::SimulationConfig;
use crate::error::KernelResult;
use crate::system::{StepContext, System};
use crate::systems::{
    DetectCollisions, Integrate, PropagateTransforms, ResolveCollisions, SampleKinematicVelocities,
};

/// Fixed-timestep driver that owns a [`World`] and runs the tick schedule.
///
/// Every tick runs, in order: integrate, propagate transforms, sample
/// kinematic velocities, detect collisions, resolve collisions, propagate
/// transforms again. After a tick the world matrices reflect the resolved
/// positions.
///
/// Hosts either call [`step`](Self::step) once per tick or feed variable frame
/// time to [`advance`](Self::advance), which runs whole ticks and carries the
/// remainder.
///
/// # Example
///
/// ```
/// use simkernel_ecs::{Simulation, SimulationConfig};
/// use simkernel_ecs::components::{RigidBody, Transform};
///
/// let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
/// let world = sim.world_mut();
/// let ball = world.create_entity().unwrap();
/// world.insert(ball, Transform::from_xyz(0.0, 10.0, 0.0)).unwrap();
/// world.insert(ball, RigidBody::dynamic()).unwrap();
///
/// sim.run_ticks(60).unwrap();
/// let y = sim.world().get::<Transform>(ball).unwrap().world_translation().y;
/// assert!(y < 10.0);
/// ```
pub struct Simulation {
    world: World,
    config: SimulationConfig,
    schedule: Vec<Box<dyn System>>,
    tick: u64,
    accumulator: f32,
}

impl Simulation {
    /// Creates a simulation with an empty world sized by `config`.
    pub fn new(config: SimulationConfig) -> KernelResult<Self> {
        config.validate()?;
        let schedule: Vec<Box<dyn System>> = vec![
            Box::new(Integrate),
            Box::new(PropagateTransforms),
            Box::new(SampleKinematicVelocities),
            Box::new(DetectCollisions),
            Box::new(ResolveCollisions),
            Box::new(PropagateTransforms),
        ];
        log::debug!(
            "Simulation created: dt={}, gravity={}, capacity={}",
            config.timestep,
            config.gravity,
            config.entity_capacity
        );
        Ok(Self {
            world: World::with_capacity(config.entity_capacity),
            config,
            schedule,
            tick: 0,
            accumulator: 0.0,
        })
    }

    /// Returns the simulated world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns the simulated world for scene edits between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns the configuration the simulation was created with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Seconds of frame time waiting for the next tick.
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }

    /// Names of the scheduled systems in execution order.
    pub fn schedule(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schedule.iter().map(|system| system.name())
    }

    /// Runs exactly one tick.
    ///
    /// An error from any system aborts the rest of the tick and is returned;
    /// the tick counter does not advance.
    pub fn step(&mut self) -> KernelResult<()> {
        let ctx = StepContext {
            dt: self.config.timestep,
            gravity: self.config.gravity,
            tick: self.tick,
        };
        for system in &self.schedule {
            if let Err(err) = system.run(&mut self.world, &ctx) {
                log::error!("Tick {} aborted in {}: {err}", ctx.tick, system.name());
                return Err(err);
            }
        }
        self.tick += 1;
        Ok(())
    }

    /// Runs `ticks` ticks back to back.
    pub fn run_ticks(&mut self, ticks: u32) -> KernelResult<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Adds `elapsed` seconds of frame time and runs every whole tick it
    /// covers, up to `max_substeps`.
    ///
    /// Time beyond that limit is dropped, keeping only the fraction of a tick
    /// still pending. Negative or non-finite `elapsed` counts as zero.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32) -> KernelResult<u32> {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let dt = self.config.timestep;
        let mut substeps = 0;
        while self.accumulator >= dt && substeps < self.config.max_substeps {
            self.step()?;
            self.accumulator -= dt;
            substeps += 1;
        }

        if self.accumulator >= dt {
            let dropped = (self.accumulator / dt).floor();
            log::warn!(
                "Simulation falling behind: dropping {dropped} ticks after {substeps} substeps"
            );
            self.accumulator -= dropped * dt;
        }
        Ok(substeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{RigidBody, Transform};

    fn config(timestep: f32, max_substeps: u32) -> SimulationConfig {
        SimulationConfig {
            timestep,
            max_substeps,
            ..Default::default()
        }
    }

    #[test]
    fn schedule_order() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        let names: Vec<_> = sim.schedule().collect();
        assert_eq!(
            names,
            vec![
                "integrate",
                "propagate_transforms",
                "sample_kinematic_velocities",
                "detect_collisions",
                "resolve_collisions",
                "propagate_transforms",
            ]
        );
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(Simulation::new(config(0.0, 1)).is_err());
    }

    #[test]
    fn world_capacity_follows_config() {
        let sim = Simulation::new(SimulationConfig {
            entity_capacity: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sim.world().capacity(), 3);
    }

    #[test]
    fn advance_runs_whole_ticks() {
        let mut sim = Simulation::new(config(0.25, 8)).unwrap();
        assert_eq!(sim.advance(0.5).unwrap(), 2);
        assert_eq!(sim.advance(0.125).unwrap(), 0);
        assert_eq!(sim.advance(0.125).unwrap(), 1);
        assert_eq!(sim.tick_count(), 3);
        assert_eq!(sim.pending_time(), 0.0);
    }

    #[test]
    fn advance_drops_backlog_beyond_substeps() {
        let mut sim = Simulation::new(config(0.25, 2)).unwrap();
        assert_eq!(sim.advance(1.125).unwrap(), 2);
        assert_eq!(sim.tick_count(), 2);
        assert_eq!(sim.pending_time(), 0.125);
    }

    #[test]
    fn advance_ignores_negative_time() {
        let mut sim = Simulation::new(config(0.25, 2)).unwrap();
        assert_eq!(sim.advance(-1.0).unwrap(), 0);
        assert_eq!(sim.advance(f32::NAN).unwrap(), 0);
        assert_eq!(sim.pending_time(), 0.0);
    }

    #[test]
    fn step_leaves_world_clean() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let world = sim.world_mut();
        let e = world.create_entity().unwrap();
        world.insert(e, Transform::from_xyz(0.0, 5.0, 0.0)).unwrap();
        world.insert(e, RigidBody::dynamic()).unwrap();

        sim.step().unwrap();

        let t = sim.world().get::<Transform>(e).unwrap();
        assert!(!t.is_dirty());
        assert_eq!(t.world_translation(), t.translation());
        assert!(t.translation().y < 5.0);
    }

    #[test]
    fn failed_tick_does_not_count() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let world = sim.world_mut();
        let e = world.create_entity().unwrap();
        world.insert(e, Transform::from_scale(glam::Vec3::ZERO)).unwrap();

        assert!(sim.step().is_err());
        assert_eq!(sim.tick_count(), 0);
    }
}
