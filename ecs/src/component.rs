//! Component kinds, signatures, and the [`Component`] trait.
//!
//! The kernel knows a fixed set of component kinds. Each kind owns one
//! [`ComponentTable`](crate::ComponentTable) in the [`World`](crate::World) and
//! one bit in every entity's [`Signature`].

use std::ops::BitOr;

/// The closed set of component kinds the kernel stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentKind {
    Transform = 0,
    Children = 1,
    Collide = 2,
    RigidBody = 3,
}

impl ComponentKind {
    /// Every kind, in bit order.
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Transform,
        ComponentKind::Children,
        ComponentKind::Collide,
        ComponentKind::RigidBody,
    ];

    /// Returns the single-bit signature for this kind.
    #[inline]
    pub const fn bit(self) -> Signature {
        Signature(1 << self as u32)
    }
}

/// Per-entity component-presence bitmask.
///
/// Bit `k` is set when the entity carries the component kind whose
/// discriminant is `k`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u32);

impl Signature {
    /// No components.
    pub const EMPTY: Self = Self(0);

    /// Returns the underlying bitmask.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns this signature with `kind` added.
    #[inline]
    #[must_use]
    pub const fn with(self, kind: ComponentKind) -> Self {
        Self(self.0 | kind.bit().0)
    }

    /// Returns whether `kind` is present.
    #[inline]
    pub const fn contains(&self, kind: ComponentKind) -> bool {
        self.0 & kind.bit().0 != 0
    }

    /// Returns whether every bit of `mask` is present.
    #[inline]
    pub const fn contains_all(&self, mask: Signature) -> bool {
        self.0 & mask.0 == mask.0
    }

    #[inline]
    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= kind.bit().0;
    }

    #[inline]
    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !kind.bit().0;
    }

    /// Returns whether no kind is present.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<ComponentKind> for Signature {
    fn from(kind: ComponentKind) -> Self {
        kind.bit()
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl BitOr<ComponentKind> for Signature {
    type Output = Signature;

    fn bitor(self, rhs: ComponentKind) -> Signature {
        self.with(rhs)
    }
}

impl BitOr for ComponentKind {
    type Output = Signature;

    fn bitor(self, rhs: ComponentKind) -> Signature {
        self.bit().with(rhs)
    }
}

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// A component type stored by the [`World`](crate::World).
///
/// Implemented only for the kernel's own component types; each one maps to a
/// [`ComponentKind`] and to the table that stores it. Dispatch is static.
pub trait Component: Sealed + Sized + 'static {
    /// The kind this type is stored under.
    const KIND: ComponentKind;

    #[doc(hidden)]
    fn table(world: &crate::World) -> &crate::ComponentTable<Self>;

    #[doc(hidden)]
    fn table_mut(world: &mut crate::World) -> &mut crate::ComponentTable<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_bits_are_distinct() {
        let mut seen = 0u32;
        for kind in ComponentKind::ALL {
            let bits = kind.bit().bits();
            assert_eq!(bits.count_ones(), 1);
            assert_eq!(seen & bits, 0);
            seen |= bits;
        }
    }

    #[test]
    fn contains_all_requires_every_bit() {
        let mask = ComponentKind::Transform | ComponentKind::Collide;
        let sig = Signature::EMPTY
            .with(ComponentKind::Transform)
            .with(ComponentKind::Collide)
            .with(ComponentKind::RigidBody);
        assert!(sig.contains_all(mask));
        assert!(!Signature::from(ComponentKind::Transform).contains_all(mask));
        assert!(sig.contains_all(Signature::EMPTY));
    }

    #[test]
    fn insert_and_remove() {
        let mut sig = Signature::EMPTY;
        sig.insert(ComponentKind::Children);
        assert!(sig.contains(ComponentKind::Children));
        sig.remove(ComponentKind::Children);
        assert!(sig.is_empty());
    }
}
