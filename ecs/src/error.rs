use thiserror::Error;

use crate::Entity;

/// Errors raised by the simulation kernel.
///
/// Every variant is a violated precondition. None of them are retryable:
/// the tick that produced one is abandoned and the error is handed to the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A fresh entity slot was requested past the configured capacity.
    #[error("entity capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: u32 },
    /// The entity was destroyed twice (or never allocated).
    #[error("{0} has already been destroyed")]
    AlreadyDestroyed(Entity),
    /// The world matrix of the entity has a zero determinant.
    #[error("world matrix of {0} is not invertible")]
    NonInvertibleTransform(Entity),
    /// A component or child link was attached to a dead entity.
    #[error("{0} is not alive")]
    NotAlive(Entity),
    /// The simulation configuration could not be parsed or is out of range.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the kernel.
pub type KernelResult<T> = Result<T, KernelError>;
