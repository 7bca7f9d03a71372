//! Collider component and its derived bounding box.

use glam::Vec3;

use crate::Entity;

/// Collision layer bitmask for filtering collision interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Default collision layer (layer 0).
    pub const DEFAULT: Self = Self(1);

    /// All layers enabled.
    pub const ALL: Self = Self(u32::MAX);

    /// No layers enabled.
    pub const NONE: Self = Self(0);

    /// Creates a collision layer with a single layer enabled.
    #[inline]
    pub const fn layer(layer: u8) -> Self {
        Self(1 << (layer as u32 & 31))
    }

    /// Returns the underlying bitmask.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Adds a layer to this mask.
    #[inline]
    #[must_use]
    pub const fn with_layer(self, layer: u8) -> Self {
        Self(self.0 | (1 << (layer as u32 & 31)))
    }

    /// Checks if this mask intersects with another (shares at least one layer).
    #[inline]
    pub const fn intersects(&self, other: &CollisionLayer) -> bool {
        (self.0 & other.0) != 0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// World-space axis-aligned bounding box of a collider.
///
/// `center` is the translation of the collider's world matrix. Under rotation
/// it is generally not the midpoint of `min` and `max`; collision response
/// relies on that exact value, so it is never recomputed from the extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb {
    /// Returns whether the boxes overlap. Touching faces do not count.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && self.max.cmpgt(other.min).all()
    }
}

/// One contact recorded on a collider this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// The entity that was hit.
    pub other: Entity,
    /// Minimum translation that pushes this collider out of `other`.
    pub hit: Vec3,
}

/// Box collider attached to an entity's [`Transform`](super::Transform).
///
/// The box is the unit cube scaled by [`size`](Self::size) and then placed by
/// the entity's world matrix. Its world-space [`Aabb`] is computed when the
/// collider is first seen, then every tick for dynamic colliders only.
///
/// # Example
///
/// ```
/// use simkernel_ecs::components::{Collide, CollisionLayer};
/// use glam::Vec3;
///
/// let floor = Collide::fixed(Vec3::new(10.0, 1.0, 10.0)).with_mask(CollisionLayer::NONE);
/// let crate_box = Collide::dynamic(Vec3::ONE)
///     .with_layers(CollisionLayer::layer(1))
///     .with_mask(CollisionLayer::DEFAULT);
/// assert!(crate_box.can_hit(&floor));
/// assert!(!floor.can_hit(&crate_box));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Collide {
    /// Whether the collider moves and must be re-bounded every tick.
    pub dynamic: bool,
    /// Layers this collider belongs to.
    pub layers: CollisionLayer,
    /// Layers this collider reacts to.
    pub mask: CollisionLayer,
    /// Box scale factors applied to the unit cube.
    pub size: Vec3,
    pub(crate) aabb: Aabb,
    pub(crate) is_new: bool,
    pub(crate) collisions: Vec<Collision>,
}

impl Collide {
    /// Creates a collider of the given size on the default layer, reacting to
    /// every layer.
    pub fn new(size: Vec3, dynamic: bool) -> Self {
        Self {
            dynamic,
            layers: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
            size,
            aabb: Aabb::default(),
            is_new: true,
            collisions: Vec::new(),
        }
    }

    /// Creates a collider that is re-bounded every tick.
    #[inline]
    pub fn dynamic(size: Vec3) -> Self {
        Self::new(size, true)
    }

    /// Creates a collider that is bounded once and assumed never to move.
    #[inline]
    pub fn fixed(size: Vec3) -> Self {
        Self::new(size, false)
    }

    /// Returns this collider on the given layers.
    #[inline]
    #[must_use]
    pub fn with_layers(mut self, layers: CollisionLayer) -> Self {
        self.layers = layers;
        self
    }

    /// Returns this collider with the given mask.
    #[inline]
    #[must_use]
    pub fn with_mask(mut self, mask: CollisionLayer) -> Self {
        self.mask = mask;
        self
    }

    /// Whether this collider's mask selects any of `other`'s layers.
    #[inline]
    pub fn can_hit(&self, other: &Collide) -> bool {
        self.mask.intersects(&other.layers)
    }

    /// World-space bounds as of the last computation.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Contacts recorded during the current tick.
    #[inline]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Whether the collider has not been bounded yet.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Requests a fresh bounding pass, e.g. after teleporting a fixed collider.
    #[inline]
    pub fn mark_new(&mut self) {
        self.is_new = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(min: Vec3, max: Vec3) -> Aabb {
        Aabb {
            min,
            max,
            center: (min + max) * 0.5,
            half: (max - min) * 0.5,
        }
    }

    #[test]
    fn layer_helpers() {
        let mask = CollisionLayer::layer(0).with_layer(3);
        assert_eq!(mask.bits(), 0b1001);
        assert!(mask.intersects(&CollisionLayer::layer(3)));
        assert!(!mask.intersects(&CollisionLayer::layer(1)));
        assert!(!CollisionLayer::NONE.intersects(&CollisionLayer::ALL));
    }

    #[test]
    fn aabb_overlap_is_strict() {
        let a = aabb(Vec3::ZERO, Vec3::ONE);
        let b = aabb(Vec3::splat(0.5), Vec3::splat(1.5));
        let touching = aabb(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn can_hit_is_directional() {
        let a = Collide::dynamic(Vec3::ONE)
            .with_layers(CollisionLayer::layer(0))
            .with_mask(CollisionLayer::layer(1));
        let b = Collide::fixed(Vec3::ONE)
            .with_layers(CollisionLayer::layer(1))
            .with_mask(CollisionLayer::NONE);
        assert!(a.can_hit(&b));
        assert!(!b.can_hit(&a));
    }

    #[test]
    fn new_collider_starts_unbounded() {
        let c = Collide::fixed(Vec3::ONE);
        assert!(c.is_new());
        assert!(c.collisions().is_empty());
        assert!(!c.dynamic);
    }
}
