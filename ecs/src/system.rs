use crate::World;
use crate::error::KernelResult;

/// Per-tick values handed to every system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    /// Seconds simulated by this tick.
    pub dt: f32,
    /// Vertical acceleration applied to dynamic bodies.
    pub gravity: f32,
    /// Index of the tick being run, starting at 0.
    pub tick: u64,
}

/// A unit of per-tick work over the [`World`].
///
/// Systems run strictly in schedule order with exclusive access to the world.
/// An error aborts the remainder of the tick.
pub trait System {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the system once.
    fn run(&self, world: &mut World, step: &StepContext) -> KernelResult<()>;
}
