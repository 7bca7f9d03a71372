//! Rigid-body motion: integration, kinematic sampling and collision response.
//!
//! One tick runs [`integrate`] before the first transform propagation,
//! [`sample_kinematic_velocities`] right after it, and [`resolve_collisions`]
//! once contacts are known. Bodies without a `Transform` are ignored.

use glam::Vec3;

use crate::component::ComponentKind;
use crate::components::{Collision, RigidBodyType};
use crate::error::KernelResult;
use crate::system::{StepContext, System};
use crate::{Entity, World};

/// System that applies acceleration and gravity to dynamic bodies.
///
/// # Access
///
/// - Writes: `RigidBody`, `Transform`
pub struct Integrate;

impl System for Integrate {
    fn name(&self) -> &'static str {
        "integrate"
    }

    fn run(&self, world: &mut World, step: &StepContext) -> KernelResult<()> {
        let moved = integrate(world, step.dt, step.gravity);
        log::trace!("integrate: {moved} dynamic bodies moved");
        Ok(())
    }
}

/// System that derives kinematic velocities from observed displacement.
///
/// # Access
///
/// - Reads: `Transform`
/// - Writes: `RigidBody`
pub struct SampleKinematicVelocities;

impl System for SampleKinematicVelocities {
    fn name(&self) -> &'static str {
        "sample_kinematic_velocities"
    }

    fn run(&self, world: &mut World, step: &StepContext) -> KernelResult<()> {
        sample_kinematic_velocities(world, step.dt);
        Ok(())
    }
}

/// System that turns this tick's contacts into position corrections and
/// resolved velocities.
///
/// # Access
///
/// - Reads: `Collide`
/// - Writes: `RigidBody`, `Transform`
pub struct ResolveCollisions;

impl System for ResolveCollisions {
    fn name(&self) -> &'static str {
        "resolve_collisions"
    }

    fn run(&self, world: &mut World, _step: &StepContext) -> KernelResult<()> {
        let contacts = resolve_collisions(world);
        log::trace!("resolve_collisions: {contacts} contacts resolved");
        Ok(())
    }
}

fn bodies(world: &World) -> Vec<Entity> {
    world
        .query(ComponentKind::Transform | ComponentKind::RigidBody)
        .collect()
}

/// Advances every dynamic body by one step of `dt` seconds.
///
/// The integrated velocity is the resolved velocity plus accumulated
/// acceleration, with `gravity` added on Y. The translation moves by that
/// velocity and the accumulated acceleration is cleared.
///
/// Returns the number of bodies integrated.
pub fn integrate(world: &mut World, dt: f32, gravity: f32) -> usize {
    let mut moved = 0;
    for entity in bodies(world) {
        let Some(body) = world.rigid_bodies.get_mut(entity) else {
            continue;
        };
        if body.kind != RigidBodyType::Dynamic {
            continue;
        }
        body.velocity_integrated = body.velocity_resolved + body.acceleration * dt;
        body.velocity_integrated.y += gravity * dt;
        body.acceleration = Vec3::ZERO;
        let displacement = body.velocity_integrated * dt;

        if let Some(transform) = world.transforms.get_mut(entity) {
            transform.translate(displacement);
        }
        moved += 1;
    }
    moved
}

/// Records every body's world position and, for kinematic bodies, the
/// velocity implied by the movement since the previous call.
///
/// Must run after transforms are propagated. A kinematic body sampled for
/// the first time measures its movement from the origin.
pub fn sample_kinematic_velocities(world: &mut World, dt: f32) {
    for entity in bodies(world) {
        let Some(position) = world
            .transforms
            .get(entity)
            .map(|transform| transform.world_translation())
        else {
            continue;
        };
        let Some(body) = world.rigid_bodies.get_mut(entity) else {
            continue;
        };
        if body.kind == RigidBodyType::Kinematic {
            body.velocity_integrated = (position - body.last_position) / dt;
        }
        body.last_position = position;
    }
}

/// Applies this tick's contacts to every non-static body.
///
/// Dynamic bodies are pushed out of each rigid-body contact and take a new
/// resolved velocity: reflected off static bodies, copied from moving ones,
/// then scaled by bounciness. A slow upward push lands the body. Contacts with
/// colliders that have no rigid body are ignored. Kinematic bodies keep their
/// sampled velocity.
///
/// Returns the number of contacts that moved a body.
pub fn resolve_collisions(world: &mut World) -> usize {
    let mut resolved = 0;
    for entity in bodies(world) {
        let Some(kind) = world.rigid_bodies.get(entity).map(|body| body.kind) else {
            continue;
        };
        match kind {
            RigidBodyType::Dynamic => resolved += resolve_dynamic(world, entity),
            RigidBodyType::Kinematic => {
                if let Some(body) = world.rigid_bodies.get_mut(entity) {
                    body.velocity_resolved = body.velocity_integrated;
                }
            }
            RigidBodyType::Static => {}
        }
    }
    resolved
}

fn resolve_dynamic(world: &mut World, entity: Entity) -> usize {
    let contacts: Vec<Collision> = world
        .colliders
        .get(entity)
        .map(|collide| collide.collisions.clone())
        .unwrap_or_default();

    let mut resolved = 0;
    if let Some(body) = world.rigid_bodies.get_mut(entity) {
        body.is_airborne = true;
    }

    for Collision { other, hit } in contacts {
        let Some((other_kind, other_velocity)) = world
            .rigid_bodies
            .get(other)
            .map(|body| (body.kind, body.velocity_integrated))
        else {
            continue;
        };

        if let Some(transform) = world.transforms.get_mut(entity) {
            transform.translate(hit);
        }

        let Some(body) = world.rigid_bodies.get_mut(entity) else {
            continue;
        };
        let mut velocity = match other_kind {
            RigidBodyType::Static => reflect(body.velocity_integrated, hit.normalize_or_zero()),
            RigidBodyType::Dynamic | RigidBodyType::Kinematic => other_velocity,
        };
        velocity *= body.bounciness;
        if hit.y > 0.0 && velocity.y < 1.0 {
            velocity.y = 0.0;
            body.is_airborne = false;
        }
        body.velocity_resolved = velocity;
        resolved += 1;
    }

    if resolved == 0 && let Some(body) = world.rigid_bodies.get_mut(entity) {
        body.velocity_resolved = body.velocity_integrated;
    }
    resolved
}

/// Reflects `velocity` about the plane with unit `normal`.
fn reflect(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
