use crate::Entity;

/// Sparse component table indexed directly by entity slot.
///
/// Slot `i` holds the component of entity `i`, or `None` if that entity does
/// not carry it. The table grows (filling with `None`) when an entity past
/// its end receives a component. Iteration is in ascending entity order.
///
/// The [`World`](crate::World) keeps every table in lockstep with the entity
/// signatures; a table reached through the world never holds data for an
/// entity whose signature bit is clear.
pub struct ComponentTable<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> ComponentTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` for the entity, returning the previous value if any.
    pub(crate) fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        let slot = entity.slot();
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        let previous = self.slots[slot].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Removes and returns the entity's value.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let removed = self.slots.get_mut(entity.slot())?.take();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Returns a reference to the entity's value.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.slot())?.as_ref()
    }

    /// Returns a mutable reference to the entity's value.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.slot())?.as_mut()
    }

    /// Returns whether the entity has a value in this table.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the table stores nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over `(entity, &value)` pairs in ascending entity order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| Some((Entity::from_index(slot as u32), value.as_ref()?)))
    }

    /// Iterates over `(entity, &mut value)` pairs in ascending entity order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, value)| Some((Entity::from_index(slot as u32), value.as_mut()?)))
    }
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
