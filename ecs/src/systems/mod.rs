//! Systems run by the fixed tick.
//!
//! Systems contain the logic that operates on components. They are organized by functionality:
//!
//! - [`transform_propagation`]: Computes world-space transforms from the hierarchy
//! - [`collision`]: Bounds colliders and records overlapping pairs
//! - [`physics`]: Integrates, samples and resolves rigid bodies
//!
//! Each system is a unit struct implementing [`System`](crate::System) with a
//! plain function behind it, so a host can either hand the structs to a
//! [`Simulation`](crate::Simulation) or call the functions directly:
//!
//! ```
//! use simkernel_ecs::World;
//! use simkernel_ecs::components::Transform;
//! use simkernel_ecs::systems::propagate_transforms;
//!
//! let mut world = World::new();
//! let e = world.create_entity().unwrap();
//! world.insert(e, Transform::from_xyz(0.0, 1.0, 0.0)).unwrap();
//! assert_eq!(propagate_transforms(&mut world).unwrap(), 1);
//! ```

pub mod collision;
pub mod physics;
pub mod transform_propagation;

pub use collision::{CollisionStats, DetectCollisions, compute_aabb, detect_collisions, penetrate};
pub use physics::{
    Integrate, ResolveCollisions, SampleKinematicVelocities, integrate, resolve_collisions,
    sample_kinematic_velocities,
};
pub use transform_propagation::{PropagateTransforms, propagate_transforms};
