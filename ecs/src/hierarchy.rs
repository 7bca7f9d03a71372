//! Parent-child hierarchy operations.
//!
//! [`Children`] lists are the single source of truth for the hierarchy. These
//! helpers edit them and also keep each child's last-known parent and dirty
//! flag in step, so the next
//! [`propagate_transforms`](crate::systems::propagate_transforms) places the
//! child correctly even when its parent did not change.
//!
//! # Usage
//!
//! ```
//! use simkernel_ecs::World;
//! use simkernel_ecs::components::Transform;
//! use simkernel_ecs::hierarchy::{add_child, destroy_recursive};
//!
//! let mut world = World::new();
//! let parent = world.create_entity().unwrap();
//! let child = world.create_entity().unwrap();
//! world.insert(parent, Transform::IDENTITY).unwrap();
//! world.insert(child, Transform::IDENTITY).unwrap();
//!
//! add_child(&mut world, parent, child).unwrap();
//! destroy_recursive(&mut world, parent).unwrap();
//! assert!(!world.is_alive(child));
//! ```

use crate::components::{Children, Transform};
use crate::error::{KernelError, KernelResult};
use crate::{Entity, World};

/// Makes `child` the last child of `parent`.
///
/// `child` is first unlinked from any other parent. If `parent` has no
/// [`Children`] component, one is created. The child's transform (if any)
/// records `parent` as its parent and is marked dirty.
///
/// # Panics
///
/// Panics if `child == parent` (cannot parent to self).
pub fn add_child(world: &mut World, parent: Entity, child: Entity) -> KernelResult<()> {
    assert_ne!(child, parent, "Cannot set entity as its own parent: {child}");

    for entity in [parent, child] {
        if !world.is_alive(entity) {
            return Err(KernelError::NotAlive(entity));
        }
    }

    if world
        .get::<Children>(parent)
        .is_some_and(|children| children.contains(child))
    {
        return Ok(()); // Already parented correctly
    }

    unlink(world, child);

    if let Some(children) = world.get_mut::<Children>(parent) {
        children.0.push(child);
    } else {
        world.insert(parent, Children(vec![child]))?;
    }

    if let Some(transform) = world.get_mut::<Transform>(child) {
        transform.parent = Some(parent);
        transform.mark_dirty();
    }
    Ok(())
}

/// Detaches `child` from its parent, making it a root.
///
/// Does nothing to the links if `child` has no parent. The child's transform
/// (if any) forgets its parent and is marked dirty.
pub fn remove_child(world: &mut World, child: Entity) {
    unlink(world, child);

    if let Some(transform) = world.get_mut::<Transform>(child) {
        transform.parent = None;
        transform.mark_dirty();
    }
}

/// Returns the entity whose [`Children`] list contains `child`.
pub fn parent_of(world: &World, child: Entity) -> Option<Entity> {
    world
        .read::<Children>()
        .iter()
        .find(|(_, children)| children.contains(child))
        .map(|(parent, _)| parent)
}

/// Collects `entity` and all of its descendants, depth-first, parents first.
pub fn descendants(world: &World, entity: Entity) -> Vec<Entity> {
    let mut out = Vec::new();
    let mut stack = vec![entity];
    while let Some(current) = stack.pop() {
        out.push(current);
        if let Some(children) = world.get::<Children>(current) {
            stack.extend(children.iter().rev().copied());
        }
    }
    out
}

/// Destroys an entity and all its descendants.
///
/// Descendants are destroyed depth-first before their parents. Destroying
/// the entity also removes it from its parent's children list (if any).
pub fn destroy_recursive(world: &mut World, entity: Entity) -> KernelResult<()> {
    if !world.is_alive(entity) {
        return Err(KernelError::AlreadyDestroyed(entity));
    }
    destroy_subtree(world, entity)
}

fn destroy_subtree(world: &mut World, entity: Entity) -> KernelResult<()> {
    // Collect children first to avoid borrow issues
    let child_entities = world
        .remove::<Children>(entity)
        .map(|c| c.0)
        .unwrap_or_default();

    for child in child_entities {
        // Children lists are public and may hold links to dead entities
        if world.is_alive(child) {
            destroy_subtree(world, child)?;
        }
    }

    world.destroy_entity(entity)
}

/// Removes `child` from every children list that holds it.
fn unlink(world: &mut World, child: Entity) {
    for (_, children) in world.children.iter_mut() {
        children.0.retain(|&e| e != child);
    }
}
