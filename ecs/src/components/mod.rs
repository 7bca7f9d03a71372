//! Component types stored by the kernel.
//!
//! - [`Transform`]: local TRS plus cached world matrices
//! - [`Children`]: ordered child links owned by the parent
//! - [`Collide`]: box collider with its derived [`Aabb`] and per-tick contacts
//! - [`RigidBody`]: velocity state for [`RigidBodyType`] bodies

mod collision;
mod hierarchy;
mod rigid_body;
mod transform;

pub use collision::{Aabb, Collide, Collision, CollisionLayer};
pub use hierarchy::Children;
pub use rigid_body::{RigidBody, RigidBodyType};
pub use transform::Transform;
