use glam::Vec3;

/// Type of rigid body determining physics behavior.
///
/// Transitions between kinds are decided by the host (a player grabbing a
/// ladder switches from `Dynamic` to `Kinematic`); the physics systems only
/// react to the current kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RigidBodyType {
    /// Integrated under gravity and deflected by collisions.
    #[default]
    Dynamic,

    /// Moved by code; velocity is sampled from observed displacement.
    Kinematic,

    /// Immovable; deflects dynamic bodies but is never resolved itself.
    Static,
}

/// Rigid body component for physics simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub kind: RigidBodyType,

    /// Post-collision velocity multiplier in `[0, 1]`.
    pub bounciness: f32,

    /// Externally accumulated acceleration, consumed by the next integration.
    pub acceleration: Vec3,

    /// Velocity after integration (or sampling, for kinematic bodies).
    pub velocity_integrated: Vec3,

    /// Velocity after collision response; the base for the next integration.
    pub velocity_resolved: Vec3,

    /// World position observed on the previous tick.
    pub last_position: Vec3,

    /// Whether the body is not resting on anything this tick.
    pub is_airborne: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            kind: RigidBodyType::Dynamic,
            bounciness: 0.0,
            acceleration: Vec3::ZERO,
            velocity_integrated: Vec3::ZERO,
            velocity_resolved: Vec3::ZERO,
            last_position: Vec3::ZERO,
            is_airborne: true,
        }
    }
}

impl RigidBody {
    /// Creates a new dynamic rigid body.
    #[inline]
    pub fn dynamic() -> Self {
        Self::default()
    }

    /// Creates a new kinematic rigid body.
    #[inline]
    pub fn kinematic() -> Self {
        Self {
            kind: RigidBodyType::Kinematic,
            ..Default::default()
        }
    }

    /// Creates a new static rigid body.
    #[inline]
    pub fn fixed() -> Self {
        Self {
            kind: RigidBodyType::Static,
            ..Default::default()
        }
    }

    /// Returns this rigid body with the specified bounciness, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn with_bounciness(mut self, bounciness: f32) -> Self {
        self.bounciness = bounciness.clamp(0.0, 1.0);
        self
    }

    /// Returns this rigid body with an initial velocity.
    #[inline]
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity_integrated = velocity;
        self.velocity_resolved = velocity;
        self
    }

    /// Adds to the acceleration consumed by the next integration step.
    #[inline]
    pub fn accelerate(&mut self, acceleration: Vec3) {
        self.acceleration += acceleration;
    }

    /// Velocity the body leaves the current tick with.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity_resolved
    }
}
