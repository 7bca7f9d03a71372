use crate::Entity;

/// Stores the ordered list of child entities.
///
/// This list is the single source of truth for the hierarchy. The parent owns
/// the links, not the children's lifetimes. Prefer the helpers in
/// [`hierarchy`](crate::hierarchy) over editing it directly: they also keep
/// the children's last-known parent and dirty flags in step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Children(pub Vec<Entity>);

impl Children {
    /// Iterates over child entities in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.0.iter()
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether this entity has no children.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether `entity` is a direct child.
    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }
}

impl From<Vec<Entity>> for Children {
    fn from(children: Vec<Entity>) -> Self {
        Self(children)
    }
}
