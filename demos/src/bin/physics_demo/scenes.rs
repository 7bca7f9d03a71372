//! Demo scene definitions.
//!
//! Each scene spawns entities with [`RigidBody`] + [`Collide`] + [`Transform`]
//! components and may drive kinematic bodies or animated transforms between
//! ticks.

use std::cell::Cell;

use glam::{Quat, Vec3};
use simkernel_ecs::components::{Collide, CollisionLayer, RigidBody, Transform};
use simkernel_ecs::hierarchy::add_child;
use simkernel_ecs::{Entity, KernelResult, World};

/// A demo scene.
pub trait DemoScene {
    /// Display name used in logs.
    fn name(&self) -> &str;

    /// Populate the world and return the entities worth reporting.
    fn setup(&self, world: &mut World) -> KernelResult<Vec<Entity>>;

    /// Per-tick callback run before the simulation steps.
    fn update(&self, _world: &mut World, _tick: u64) {}
}

/// Helper: spawn an entity with a transform, a box collider and a body.
fn spawn_body(
    world: &mut World,
    transform: Transform,
    collide: Collide,
    body: RigidBody,
) -> KernelResult<Entity> {
    let entity = world.create_entity()?;
    world.insert(entity, transform)?;
    world.insert(entity, collide)?;
    world.insert(entity, body)?;
    Ok(entity)
}

fn spawn_ground(world: &mut World) -> KernelResult<Entity> {
    spawn_body(
        world,
        Transform::IDENTITY,
        Collide::fixed(Vec3::new(20.0, 1.0, 20.0)),
        RigidBody::fixed(),
    )
}

// ---------------------------------------------------------------------------
// Boxes: ground plane + a column of falling boxes
// ---------------------------------------------------------------------------

pub struct BoxesScene;

impl DemoScene for BoxesScene {
    fn name(&self) -> &str {
        "Boxes"
    }

    fn setup(&self, world: &mut World) -> KernelResult<Vec<Entity>> {
        spawn_ground(world)?;

        let mut boxes = Vec::new();
        for i in 0..5 {
            let height = 3.0 + i as f32 * 1.5;
            let bounciness = 0.2 * i as f32;
            boxes.push(spawn_body(
                world,
                Transform::from_xyz(i as f32 * 0.3, height, 0.0),
                Collide::dynamic(Vec3::ONE),
                RigidBody::dynamic().with_bounciness(bounciness),
            )?);
        }
        Ok(boxes)
    }
}

// ---------------------------------------------------------------------------
// Platform: a kinematic platform sliding back and forth with a box on top
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PlatformScene {
    platform: Cell<Option<Entity>>,
}

impl DemoScene for PlatformScene {
    fn name(&self) -> &str {
        "Platform"
    }

    fn setup(&self, world: &mut World) -> KernelResult<Vec<Entity>> {
        spawn_ground(world)?;
        let platform = spawn_body(
            world,
            Transform::from_xyz(0.0, 2.0, 0.0),
            Collide::dynamic(Vec3::new(4.0, 0.5, 4.0)),
            RigidBody::kinematic(),
        )?;
        let rider = spawn_body(
            world,
            Transform::from_xyz(0.0, 3.0, 0.0),
            Collide::dynamic(Vec3::ONE),
            RigidBody::dynamic().with_bounciness(1.0),
        )?;
        self.platform.set(Some(platform));
        Ok(vec![platform, rider])
    }

    fn update(&self, world: &mut World, tick: u64) {
        let Some(platform) = self.platform.get() else {
            return;
        };
        // Two seconds one way, two seconds back
        let direction = if (tick / 120) % 2 == 0 { 1.0 } else { -1.0 };
        if let Some(transform) = world.get_mut::<Transform>(platform) {
            transform.translate(Vec3::new(direction * 0.02, 0.0, 0.0));
        }
    }
}

// ---------------------------------------------------------------------------
// Carousel: a spinning hub whose child paddles sweep sensor boxes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CarouselScene {
    hub: Cell<Option<Entity>>,
}

impl DemoScene for CarouselScene {
    fn name(&self) -> &str {
        "Carousel"
    }

    fn setup(&self, world: &mut World) -> KernelResult<Vec<Entity>> {
        let hub = world.create_entity()?;
        world.insert(hub, Transform::from_xyz(0.0, 1.0, 0.0))?;

        let mut reported = vec![hub];
        for i in 0..4 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_2;
            let paddle = world.create_entity()?;
            world.insert(
                paddle,
                Transform::from_translation(Quat::from_rotation_y(angle) * Vec3::new(3.0, 0.0, 0.0)),
            )?;
            world.insert(
                paddle,
                Collide::dynamic(Vec3::new(1.0, 1.0, 0.2)).with_layers(CollisionLayer::layer(1)),
            )?;
            add_child(world, hub, paddle)?;
            reported.push(paddle);
        }

        // Sensors only listen to the paddle layer
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_4 + 0.2;
            let sensor = world.create_entity()?;
            world.insert(
                sensor,
                Transform::from_translation(
                    Quat::from_rotation_y(angle) * Vec3::new(3.0, 1.0, 0.0),
                ),
            )?;
            world.insert(
                sensor,
                Collide::fixed(Vec3::splat(0.5))
                    .with_layers(CollisionLayer::layer(2))
                    .with_mask(CollisionLayer::layer(1)),
            )?;
            reported.push(sensor);
        }

        self.hub.set(Some(hub));
        Ok(reported)
    }

    fn update(&self, world: &mut World, _tick: u64) {
        let Some(hub) = self.hub.get() else {
            return;
        };
        if let Some(transform) = world.get_mut::<Transform>(hub) {
            let rotation = Quat::from_rotation_y(0.02) * transform.rotation();
            transform.set_rotation(rotation);
        }
    }
}

/// All scenes in the order the demo runs them.
pub fn all_scenes() -> Vec<Box<dyn DemoScene>> {
    vec![
        Box::new(BoxesScene),
        Box::new(PlatformScene::default()),
        Box::new(CarouselScene::default()),
    ]
}
