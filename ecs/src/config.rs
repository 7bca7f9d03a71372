//! Simulation configuration.
//!
//! [`SimulationConfig`] is plain data with sensible defaults. Hosts either
//! build it in code or load it from RON text:
//!
//! ```
//! use simkernel_ecs::SimulationConfig;
//!
//! let config = SimulationConfig::from_ron_str("(gravity: -9.81)").unwrap();
//! assert_eq!(config.gravity, -9.81);
//! assert_eq!(config.timestep, 1.0 / 60.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};

/// Fixed simulation timestep in seconds.
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Vertical acceleration applied to dynamic bodies, in units per second squared.
pub const DEFAULT_GRAVITY: f32 = -3.721;

/// Entity slots available to a world unless configured otherwise.
pub const DEFAULT_ENTITY_CAPACITY: u32 = 10_000;

/// Upper bound on ticks run by one [`Simulation::advance`](crate::Simulation::advance) call.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Tunable parameters of a [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds simulated by one tick.
    pub timestep: f32,
    /// Acceleration added to the Y velocity of dynamic bodies.
    pub gravity: f32,
    /// Maximum number of entity slots.
    pub entity_capacity: u32,
    /// Maximum ticks one `advance` call may run before dropping backlog.
    pub max_substeps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: DEFAULT_TIMESTEP,
            gravity: DEFAULT_GRAVITY,
            entity_capacity: DEFAULT_ENTITY_CAPACITY,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from RON. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> KernelResult<Self> {
        let config: Self =
            ron::from_str(text).map_err(|err| KernelError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed RON.
    pub fn to_ron_string(&self) -> KernelResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|err| KernelError::InvalidConfig(err.to_string()))
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> KernelResult<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(KernelError::InvalidConfig(format!(
                "timestep must be positive and finite, got {}",
                self.timestep
            )));
        }
        if !self.gravity.is_finite() {
            return Err(KernelError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if self.entity_capacity == 0 {
            return Err(KernelError::InvalidConfig(
                "entity_capacity must be at least 1".to_string(),
            ));
        }
        if self.max_substeps == 0 {
            return Err(KernelError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
