mod scenes;

use simkernel_ecs::components::{Collide, RigidBody, Transform};
use simkernel_ecs::{Entity, Simulation, SimulationConfig, World};

use scenes::DemoScene;

/// Seconds simulated per scene.
const SCENE_SECONDS: f32 = 6.0;

/// Frame time fed to the simulation, slower than the tick rate on purpose.
const FRAME_TIME: f32 = 1.0 / 45.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("simkernel physics demo v{}", simkernel_demos::VERSION);

    // Optional RON config path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            log::info!("Loading config from {path}");
            SimulationConfig::from_ron_str(&text)?
        }
        None => SimulationConfig::default(),
    };
    log::info!("Config:\n{}", config.to_ron_string()?);

    for scene in scenes::all_scenes() {
        run_scene(scene.as_ref(), config)?;
    }
    Ok(())
}

fn run_scene(scene: &dyn DemoScene, config: SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = Simulation::new(config)?;
    let reported = scene.setup(sim.world_mut())?;
    log::info!(
        "=== {} ({} entities) ===",
        scene.name(),
        sim.world().entity_count()
    );

    let mut elapsed = 0.0;
    let mut next_report = 0.0;
    while elapsed < SCENE_SECONDS {
        let tick = sim.tick_count();
        scene.update(sim.world_mut(), tick);
        sim.advance(FRAME_TIME)?;
        elapsed += FRAME_TIME;

        if elapsed >= next_report {
            log::info!("t={elapsed:.2}s tick={}", sim.tick_count());
            for &entity in &reported {
                report(sim.world(), entity);
            }
            next_report += 1.0;
        }
    }
    Ok(())
}

fn report(world: &World, entity: Entity) {
    let Some(transform) = world.get::<Transform>(entity) else {
        return;
    };
    let position = transform.world_translation();
    let contacts = world
        .get::<Collide>(entity)
        .map_or(0, |collide| collide.collisions().len());

    match world.get::<RigidBody>(entity) {
        Some(body) => log::info!(
            "  {entity}: pos=({:.3}, {:.3}, {:.3}) vel=({:.3}, {:.3}, {:.3}) airborne={} contacts={contacts}",
            position.x,
            position.y,
            position.z,
            body.velocity().x,
            body.velocity().y,
            body.velocity().z,
            body.is_airborne,
        ),
        None => log::info!(
            "  {entity}: pos=({:.3}, {:.3}, {:.3}) contacts={contacts}",
            position.x,
            position.y,
            position.z,
        ),
    }
}
