//! # simkernel ECS
//!
//! Deterministic fixed-timestep scene simulation on a small Entity-Component-System.
//!
//! ## Core Types
//!
//! - [`Entity`] - Integer entity handle, recycled through a graveyard
//! - [`World`] - Entity store plus one [`ComponentTable`] per component kind
//! - [`Signature`] / [`ComponentKind`] - Per-entity component bitmask used by queries
//! - [`KernelError`] - Every failure the kernel reports
//!
//! ## Simulation
//!
//! - [`Simulation`] - Owns a world and runs the tick schedule at a fixed timestep
//! - [`SimulationConfig`] - Timestep, gravity and capacity, loadable from RON
//! - [`System`] - One step of the schedule; see [`systems`] for the built-in ones
//! - [`hierarchy`] - Parent/child links between transforms
//!
//! A tick runs integrate, propagate transforms, sample kinematic velocities,
//! detect collisions, resolve collisions and a final propagation. Replaying the
//! same inputs produces bit-identical state.

pub mod component;
pub mod components;
mod config;
mod entity;
mod error;
pub mod hierarchy;
mod simulation;
mod sparse_set;
mod system;
pub mod systems;
mod world;

pub use component::{Component, ComponentKind, Signature};
pub use config::{
    DEFAULT_ENTITY_CAPACITY, DEFAULT_GRAVITY, DEFAULT_MAX_SUBSTEPS, DEFAULT_TIMESTEP,
    SimulationConfig,
};
pub use entity::Entity;
pub use error::{KernelError, KernelResult};
pub use simulation::Simulation;
pub use sparse_set::ComponentTable;
pub use system::{StepContext, System};
pub use world::World;
