use crate::component::{Component, ComponentKind, Sealed, Signature};
use crate::components::{Children, Collide, RigidBody, Transform};
use crate::config::DEFAULT_ENTITY_CAPACITY;
use crate::entity::{Entity, EntityStore};
use crate::error::{KernelError, KernelResult};
use crate::sparse_set::ComponentTable;

/// The entity store and one component table per [`ComponentKind`].
///
/// The world keeps each entity's signature and the tables in lockstep: a
/// live entity's bit for kind `K` is set exactly when the `K` table holds a
/// value for it.
///
/// # Example
///
/// ```
/// use simkernel_ecs::World;
/// use simkernel_ecs::component::ComponentKind;
/// use simkernel_ecs::components::{Collide, Transform};
/// use glam::Vec3;
///
/// let mut world = World::new();
/// let entity = world.create_entity().unwrap();
/// world.insert(entity, Transform::from_xyz(0.0, 1.0, 0.0)).unwrap();
/// world.insert(entity, Collide::dynamic(Vec3::ONE)).unwrap();
///
/// let found: Vec<_> = world
///     .query(ComponentKind::Transform | ComponentKind::Collide)
///     .collect();
/// assert_eq!(found, vec![entity]);
/// ```
pub struct World {
    pub(crate) entities: EntityStore,
    pub(crate) transforms: ComponentTable<Transform>,
    pub(crate) children: ComponentTable<Children>,
    pub(crate) colliders: ComponentTable<Collide>,
    pub(crate) rigid_bodies: ComponentTable<RigidBody>,
}

impl World {
    /// Creates an empty world with the default entity capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ENTITY_CAPACITY)
    }

    /// Creates an empty world holding at most `capacity` entity slots.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            entities: EntityStore::with_capacity(capacity),
            transforms: ComponentTable::new(),
            children: ComponentTable::new(),
            colliders: ComponentTable::new(),
            rigid_bodies: ComponentTable::new(),
        }
    }

    // ---- Entity management ----

    /// Creates an entity with no components.
    ///
    /// The most recently destroyed slot is reused first. Fails with
    /// [`KernelError::CapacityExceeded`] when no slot is free and the world is
    /// at capacity.
    pub fn create_entity(&mut self) -> KernelResult<Entity> {
        let entity = self.entities.create()?;
        log::trace!("created {entity}");
        Ok(entity)
    }

    /// Destroys an entity, dropping all of its components.
    ///
    /// The entity is removed from every [`Children`] list that holds it. Its
    /// own children become roots: their transforms forget the parent and are
    /// marked dirty. The children themselves stay alive; use
    /// [`destroy_recursive`](crate::hierarchy::destroy_recursive) to destroy
    /// a whole subtree.
    pub fn destroy_entity(&mut self, entity: Entity) -> KernelResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(KernelError::AlreadyDestroyed(entity));
        }

        for (_, children) in self.children.iter_mut() {
            children.0.retain(|&e| e != entity);
        }
        if let Some(orphans) = self.children.remove(entity) {
            for orphan in orphans.0 {
                if let Some(transform) = self.transforms.get_mut(orphan) {
                    transform.parent = None;
                    transform.mark_dirty();
                }
            }
        }

        self.transforms.remove(entity);
        self.colliders.remove(entity);
        self.rigid_bodies.remove(entity);
        self.entities.destroy(entity)?;
        log::trace!("destroyed {entity}");
        Ok(())
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the maximum number of entity slots.
    pub fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    /// Returns the component signature of a live entity (empty when dead).
    pub fn signature(&self, entity: Entity) -> Signature {
        self.entities.signature(entity)
    }

    /// Iterates all alive entities in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    /// Iterates alive entities carrying every component in `mask`, in
    /// ascending index order.
    ///
    /// The scan is re-evaluated on every call; entities created or destroyed
    /// between calls are reflected immediately.
    pub fn query(&self, mask: impl Into<Signature>) -> impl Iterator<Item = Entity> + '_ {
        self.entities.matching(mask.into())
    }

    // ---- Component access ----

    /// Attaches a component, returning the value it replaced.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> KernelResult<Option<C>> {
        if !self.entities.is_alive(entity) {
            return Err(KernelError::NotAlive(entity));
        }
        self.entities.set_kind(entity, C::KIND);
        Ok(C::table_mut(self).insert(entity, component))
    }

    /// Detaches and returns a component.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let removed = C::table_mut(self).remove(entity)?;
        self.entities.clear_kind(entity, C::KIND);
        Some(removed)
    }

    /// Returns a reference to the entity's component.
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::table(self).get(entity)
    }

    /// Returns a mutable reference to the entity's component.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        C::table_mut(self).get_mut(entity)
    }

    /// Returns whether the entity carries the component.
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.entities.has(entity, C::KIND)
    }

    /// Returns the whole table for a component type.
    pub fn read<C: Component>(&self) -> &ComponentTable<C> {
        C::table(self)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Sealed for $ty {}

        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            #[inline]
            fn table(world: &World) -> &ComponentTable<Self> {
                &world.$field
            }

            #[inline]
            fn table_mut(world: &mut World) -> &mut ComponentTable<Self> {
                &mut world.$field
            }
        }
    };
}

impl_component!(Transform, Transform, transforms);
impl_component!(Children, Children, children);
impl_component!(Collide, Collide, colliders);
impl_component!(RigidBody, RigidBody, rigid_bodies);
