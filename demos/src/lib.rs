//! # simkernel Demos
//!
//! Headless demo scenes driving the simkernel ECS.
//!
//! ## Available Demos
//!
//! - `physics_demo` - Falling boxes, a moving platform and a transform
//!   hierarchy, stepped at a fixed timestep and reported through the log

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
