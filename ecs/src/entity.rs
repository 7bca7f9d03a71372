use fixedbitset::FixedBitSet;

use crate::component::{ComponentKind, Signature};
use crate::error::{KernelError, KernelResult};

/// An opaque integer handle into every component table.
///
/// Handles are plain slot indices. A destroyed slot is recycled as-is, so a
/// handle kept past [`World::destroy_entity`](crate::World::destroy_entity)
/// may alias the next entity created in that slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    /// Creates a handle for the given slot index.
    pub(crate) const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the slot index of this entity.
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates and recycles entity slots and stores their signatures.
///
/// Destroyed slots go onto a LIFO free list (the graveyard). A slot is
/// recycled before the store grows. The store never grows past `capacity`.
pub(crate) struct EntityStore {
    /// Component-presence bitmask per slot. Zero for dead slots.
    signatures: Vec<Signature>,
    /// Live flag per slot.
    alive: FixedBitSet,
    /// Recyclable slot indices (LIFO stack).
    graveyard: Vec<u32>,
    capacity: u32,
}

impl EntityStore {
    /// Creates an empty store bounded to `capacity` slots.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            signatures: Vec::new(),
            alive: FixedBitSet::new(),
            graveyard: Vec::new(),
            capacity,
        }
    }

    /// Allocates an entity, reusing the most recently destroyed slot if any.
    pub fn create(&mut self) -> KernelResult<Entity> {
        if let Some(index) = self.graveyard.pop() {
            let slot = index as usize;
            self.signatures[slot] = Signature::EMPTY;
            self.alive.insert(slot);
            return Ok(Entity::from_index(index));
        }

        let index = self.signatures.len() as u32;
        if index >= self.capacity {
            return Err(KernelError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.signatures.push(Signature::EMPTY);
        self.alive.grow(index as usize + 1);
        self.alive.insert(index as usize);
        Ok(Entity::from_index(index))
    }

    /// Marks the entity dead and pushes its slot onto the graveyard.
    pub fn destroy(&mut self, entity: Entity) -> KernelResult<()> {
        if !self.is_alive(entity) {
            return Err(KernelError::AlreadyDestroyed(entity));
        }
        let slot = entity.slot();
        self.signatures[slot] = Signature::EMPTY;
        self.alive.set(slot, false);
        self.graveyard.push(entity.index());
        Ok(())
    }

    /// Returns whether the entity's slot is currently live.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(entity.slot())
    }

    /// Returns the signature of a live entity, or the empty signature.
    pub fn signature(&self, entity: Entity) -> Signature {
        if self.is_alive(entity) {
            self.signatures[entity.slot()]
        } else {
            Signature::EMPTY
        }
    }

    /// Returns whether a live entity carries the given component kind.
    pub fn has(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.signature(entity).contains(kind)
    }

    pub fn set_kind(&mut self, entity: Entity, kind: ComponentKind) {
        self.signatures[entity.slot()].insert(kind);
    }

    pub fn clear_kind(&mut self, entity: Entity, kind: ComponentKind) {
        self.signatures[entity.slot()].remove(kind);
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.alive.count_ones(..)
    }

    /// Number of slots ever allocated (live or in the graveyard).
    pub fn slot_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Iterates live entities in ascending index order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.ones().map(|slot| Entity::from_index(slot as u32))
    }

    /// Iterates live entities whose signature contains every bit of `mask`,
    /// in ascending index order.
    pub fn matching(&self, mask: Signature) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .ones()
            .filter(move |&slot| self.signatures[slot].contains_all(mask))
            .map(|slot| Entity::from_index(slot as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_sequential() {
        let mut store = EntityStore::with_capacity(16);
        let e0 = store.create().unwrap();
        let e1 = store.create().unwrap();
        let e2 = store.create().unwrap();

        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), 1);
        assert_eq!(e2.index(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn destroy_makes_dead() {
        let mut store = EntityStore::with_capacity(16);
        let entity = store.create().unwrap();
        store.destroy(entity).unwrap();
        assert!(!store.is_alive(entity));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn double_destroy_fails() {
        let mut store = EntityStore::with_capacity(16);
        let entity = store.create().unwrap();
        store.destroy(entity).unwrap();
        assert_eq!(
            store.destroy(entity),
            Err(KernelError::AlreadyDestroyed(entity))
        );
        // The slot must be recyclable exactly once
        assert_eq!(store.create().unwrap(), entity);
        assert_eq!(store.create().unwrap().index(), 1);
    }

    #[test]
    fn destroy_unallocated_fails() {
        let mut store = EntityStore::with_capacity(16);
        let ghost = Entity::from_index(9);
        assert_eq!(
            store.destroy(ghost),
            Err(KernelError::AlreadyDestroyed(ghost))
        );
    }

    #[test]
    fn recycles_lifo() {
        let mut store = EntityStore::with_capacity(16);
        let entities: Vec<_> = (0..6).map(|_| store.create().unwrap()).collect();

        // Destroy the three most recent, newest first
        for e in entities[3..].iter().rev() {
            store.destroy(*e).unwrap();
        }

        let recycled: Vec<_> = (0..3).map(|_| store.create().unwrap()).collect();
        assert_eq!(recycled, vec![entities[3], entities[4], entities[5]]);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut store = EntityStore::with_capacity(2);
        let e0 = store.create().unwrap();
        store.create().unwrap();
        assert_eq!(
            store.create(),
            Err(KernelError::CapacityExceeded { capacity: 2 })
        );

        // Recycling still works at capacity
        store.destroy(e0).unwrap();
        assert_eq!(store.create().unwrap(), e0);
    }

    #[test]
    fn recycled_slot_has_empty_signature() {
        let mut store = EntityStore::with_capacity(4);
        let e = store.create().unwrap();
        store.set_kind(e, ComponentKind::Transform);
        store.destroy(e).unwrap();

        let e2 = store.create().unwrap();
        assert_eq!(e2, e);
        assert_eq!(store.signature(e2), Signature::EMPTY);
    }

    #[test]
    fn matching_is_ascending_and_exact() {
        let mut store = EntityStore::with_capacity(8);
        let entities: Vec<_> = (0..5).map(|_| store.create().unwrap()).collect();
        for e in &entities {
            store.set_kind(*e, ComponentKind::Transform);
        }
        store.set_kind(entities[1], ComponentKind::Collide);
        store.set_kind(entities[4], ComponentKind::Collide);
        store.destroy(entities[2]).unwrap();

        let mask = Signature::EMPTY
            .with(ComponentKind::Transform)
            .with(ComponentKind::Collide);
        let found: Vec<_> = store.matching(mask).collect();
        assert_eq!(found, vec![entities[1], entities[4]]);

        let all: Vec<_> = store.iter_alive().collect();
        assert_eq!(all, vec![entities[0], entities[1], entities[3], entities[4]]);
    }

    #[test]
    fn debug_format() {
        let entity = Entity::from_index(42);
        assert_eq!(format!("{:?}", entity), "Entity(42)");
        assert_eq!(format!("{}", entity), "Entity(42)");
    }
}
