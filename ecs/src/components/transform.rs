//! Transform component positioning entities in 3D space.

use glam::{Mat4, Quat, Vec3};

use crate::Entity;

/// Local transform of an entity plus its cached world-space matrices.
///
/// Translation, rotation, and scale are only reachable through setters,
/// each of which marks the transform dirty. The cached [`world`](Self::world)
/// and [`world_to_local`](Self::world_to_local) matrices are refreshed by
/// [`propagate_transforms`](crate::systems::propagate_transforms).
///
/// While the transform is clean, `world` equals the local TRS matrix
/// (premultiplied by the parent's world matrix when parented) and
/// `world_to_local` is its inverse.
///
/// # Example
///
/// ```
/// use simkernel_ecs::components::Transform;
/// use glam::{Quat, Vec3};
///
/// let transform = Transform::from_xyz(1.0, 2.0, 3.0)
///     .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
///     .with_scale(Vec3::splat(2.0));
/// assert!(transform.is_dirty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    pub(crate) world: Mat4,
    pub(crate) world_to_local: Mat4,
    pub(crate) dirty: bool,
    /// Last known parent. Written by propagation and the hierarchy helpers,
    /// never authoritative: [`Children`](super::Children) is.
    pub(crate) parent: Option<Entity>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform, dirty so that its first propagation fills the cache.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        world: Mat4::IDENTITY,
        world_to_local: Mat4::IDENTITY,
        dirty: true,
        parent: None,
    };

    /// Creates a transform from translation, rotation, and scale.
    #[inline]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            ..Self::IDENTITY
        }
    }

    /// Creates a transform at the given position with default rotation and scale.
    #[inline]
    pub const fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    /// Creates a transform with the given translation.
    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Creates a transform with the given rotation.
    #[inline]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Creates a transform with the given scale.
    #[inline]
    pub const fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Returns this transform with a different translation.
    #[inline]
    #[must_use]
    pub const fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self.dirty = true;
        self
    }

    /// Returns this transform with a different rotation.
    #[inline]
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self.dirty = true;
        self
    }

    /// Returns this transform with a different scale.
    #[inline]
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self.dirty = true;
        self
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Replaces the local translation and marks the transform dirty.
    #[inline]
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.dirty = true;
    }

    /// Offsets the local translation and marks the transform dirty.
    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
        self.dirty = true;
    }

    /// Replaces the local rotation and marks the transform dirty.
    #[inline]
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Replaces the local scale and marks the transform dirty.
    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Forces recomputation on the next propagation.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the cached matrices are stale.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cached world matrix.
    #[inline]
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Cached inverse of the world matrix.
    #[inline]
    pub fn world_to_local(&self) -> Mat4 {
        self.world_to_local
    }

    /// Last known parent, as recorded by the hierarchy.
    #[inline]
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// World-space position taken from the cached world matrix.
    #[inline]
    pub fn world_translation(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Computes the local matrix: rotation and scale first, translation last.
    #[inline]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Returns the local forward direction (-Z axis).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Returns the local right direction (+X axis).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the local up direction (+Y axis).
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transforms a point from this entity's local space to world space
    /// using the cached world matrix.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.world.transform_point3(point)
    }

    /// Transforms a world-space point into this entity's local space.
    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.world_to_local.transform_point3(point)
    }
}
