//! Collision detection between box colliders.
//!
//! Each tick the colliders are bounded and split into dynamic and static
//! lists, then every dynamic collider is tested against every static one and
//! against the dynamic colliders that precede it. Contacts land in
//! [`Collide::collisions`](crate::components::Collide::collisions).

use glam::{Mat4, Vec3};

use crate::component::ComponentKind;
use crate::components::{Aabb, Collision};
use crate::error::KernelResult;
use crate::system::{StepContext, System};
use crate::{Entity, World};

/// Corners of the unit cube centred on the origin.
const UNIT_CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
];

/// Counters from one detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Colliders re-bounded and tested as dynamic.
    pub dynamic: usize,
    /// Colliders tested as static.
    pub fixed: usize,
    /// Colliders bounded for the first time (not tested this tick).
    pub new: usize,
    /// Contacts appended across all colliders.
    pub contacts: usize,
}

/// System that fills every collider's contact list for the current tick.
///
/// # Access
///
/// - Reads: `Transform`
/// - Writes: `Collide`
pub struct DetectCollisions;

impl System for DetectCollisions {
    fn name(&self) -> &'static str {
        "detect_collisions"
    }

    fn run(&self, world: &mut World, _step: &StepContext) -> KernelResult<()> {
        let stats = detect_collisions(world);
        log::trace!(
            "detect_collisions: {} dynamic, {} static, {} new, {} contacts",
            stats.dynamic,
            stats.fixed,
            stats.new,
            stats.contacts
        );
        Ok(())
    }
}

/// Computes the world-space bounds of a box collider.
///
/// The eight corners of the unit cube, scaled by `size`, are carried through
/// the full affine `world_matrix`; `min`/`max` are their extrema. `center` is
/// the matrix translation, not the midpoint of the extrema.
pub fn compute_aabb(world_matrix: &Mat4, size: Vec3) -> Aabb {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for corner in UNIT_CUBE_CORNERS {
        let point = world_matrix.transform_point3(corner * size);
        min = min.min(point);
        max = max.max(point);
    }
    Aabb {
        min,
        max,
        center: world_matrix.w_axis.truncate(),
        half: (max - min) / 2.0,
    }
}

/// Minimum translation that pushes `a` out of `b`.
///
/// The overlap on each axis is `a.half + b.half - |a.center - b.center|`. The
/// axis with the strictly smallest overlap wins (ties go to X, then Y, then
/// Z). The result is zero on the other two axes and points from `b` towards
/// `a` on the chosen one; coincident centres on that axis give a zero vector.
pub fn penetrate(a: &Aabb, b: &Aabb) -> Vec3 {
    let delta = a.center - b.center;
    let overlap = a.half + b.half - delta.abs();

    let mut axis = 0;
    for candidate in 1..3 {
        if overlap[candidate] < overlap[axis] {
            axis = candidate;
        }
    }

    let mut hit = Vec3::ZERO;
    hit[axis] = overlap[axis] * sign(delta[axis]);
    hit
}

/// -1, 0 or 1. Unlike [`f32::signum`], zero maps to zero.
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Bounds all colliders and records this tick's contacts.
///
/// Colliders are visited in ascending entity order. A collider seen for the
/// first time is bounded and left out of this tick's tests. After that,
/// dynamic colliders are re-bounded every tick and static ones keep their
/// first bounds.
pub fn detect_collisions(world: &mut World) -> CollisionStats {
    let mut stats = CollisionStats::default();
    let mut dynamic: Vec<Entity> = Vec::new();
    let mut fixed: Vec<Entity> = Vec::new();

    let candidates: Vec<Entity> = world
        .query(ComponentKind::Transform | ComponentKind::Collide)
        .collect();
    for entity in candidates {
        let Some(world_matrix) = world.transforms.get(entity).map(|t| t.world) else {
            continue;
        };
        let Some(collide) = world.colliders.get_mut(entity) else {
            continue;
        };
        collide.collisions.clear();

        if collide.is_new {
            collide.aabb = compute_aabb(&world_matrix, collide.size);
            collide.is_new = false;
            stats.new += 1;
        } else if collide.dynamic {
            collide.aabb = compute_aabb(&world_matrix, collide.size);
            dynamic.push(entity);
        } else {
            fixed.push(entity);
        }
    }
    stats.dynamic = dynamic.len();
    stats.fixed = fixed.len();

    for (i, &a) in dynamic.iter().enumerate() {
        for &b in &fixed {
            stats.contacts += check(world, a, b);
        }
        for &b in &dynamic[..i] {
            stats.contacts += check(world, a, b);
        }
    }
    stats
}

/// Tests one pair and records the contacts each side's mask allows.
/// Returns the number of contacts appended.
fn check(world: &mut World, a: Entity, b: Entity) -> usize {
    let (Some(ca), Some(cb)) = (world.colliders.get(a), world.colliders.get(b)) else {
        return 0;
    };
    let a_can_hit_b = ca.can_hit(cb);
    let b_can_hit_a = cb.can_hit(ca);
    if !a_can_hit_b && !b_can_hit_a {
        return 0;
    }
    if !ca.aabb.intersects(&cb.aabb) {
        return 0;
    }
    let hit = penetrate(&ca.aabb, &cb.aabb);

    let mut contacts = 0;
    if a_can_hit_b && let Some(ca) = world.colliders.get_mut(a) {
        ca.collisions.push(Collision { other: b, hit });
        contacts += 1;
    }
    if b_can_hit_a && let Some(cb) = world.colliders.get_mut(b) {
        cb.collisions.push(Collision { other: a, hit: -hit });
        contacts += 1;
    }
    contacts
}
