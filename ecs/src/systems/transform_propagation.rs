//! Transform propagation through the entity hierarchy.
//!
//! Recomputes the cached world matrices of dirty transforms and of every
//! transform below them, parents before children.

use fixedbitset::FixedBitSet;
use glam::Mat4;

use crate::component::ComponentKind;
use crate::error::{KernelError, KernelResult};
use crate::system::{StepContext, System};
use crate::{Entity, World};

/// System that refreshes world matrices of dirty transforms and their
/// descendants.
///
/// # Access
///
/// - Reads: `Children`
/// - Writes: `Transform`
pub struct PropagateTransforms;

impl System for PropagateTransforms {
    fn name(&self) -> &'static str {
        "propagate_transforms"
    }

    fn run(&self, world: &mut World, _step: &StepContext) -> KernelResult<()> {
        let updated = propagate_transforms(world)?;
        log::trace!("propagate_transforms: {updated} transforms updated");
        Ok(())
    }
}

/// Recomputes world matrices for every dirty transform and its subtree.
///
/// Dirty transforms are visited in ascending entity order, skipping those
/// already refreshed as a descendant earlier in the same pass. Each refreshed
/// entity pushes its new matrix into all children carrying a transform,
/// whether or not the children are dirty themselves.
///
/// Returns the number of transforms recomputed; zero when nothing was dirty.
/// Fails with [`KernelError::NonInvertibleTransform`] on a singular world
/// matrix. The failing transform is left marked clean with its previous
/// `world` and `world_to_local`, and transforms not yet reached in this pass
/// keep their stale matrices. Hierarchy cycles are not detected.
pub fn propagate_transforms(world: &mut World) -> KernelResult<usize> {
    let candidates: Vec<Entity> = world.query(ComponentKind::Transform).collect();
    let mut visited = FixedBitSet::with_capacity(world.entities.slot_count());
    let mut updated = 0;

    for entity in candidates {
        if visited.contains(entity.slot()) {
            continue;
        }
        let dirty = world
            .transforms
            .get(entity)
            .is_some_and(|transform| transform.dirty);
        if dirty {
            update(world, entity, &mut visited, &mut updated)?;
        }
    }
    Ok(updated)
}

fn update(
    world: &mut World,
    entity: Entity,
    visited: &mut FixedBitSet,
    updated: &mut usize,
) -> KernelResult<()> {
    let Some(parent) = world.transforms.get(entity).map(|t| t.parent) else {
        return Ok(());
    };
    let parent_world = parent
        .filter(|&p| world.entities.has(p, ComponentKind::Transform))
        .and_then(|p| world.transforms.get(p))
        .map(|t| t.world);

    let Some(transform) = world.transforms.get_mut(entity) else {
        return Ok(());
    };
    transform.dirty = false;
    let mut matrix = transform.local_matrix();
    if let Some(parent_world) = parent_world {
        matrix = parent_world * matrix;
    }
    let inverse = try_inverse(matrix).ok_or(KernelError::NonInvertibleTransform(entity))?;
    transform.world = matrix;
    transform.world_to_local = inverse;

    visited.insert(entity.slot());
    *updated += 1;

    // Clone to avoid borrow issues
    let children: Vec<Entity> = match world.children.get(entity) {
        Some(children) => children.iter().copied().collect(),
        None => return Ok(()),
    };
    for child in children {
        if !world.entities.has(child, ComponentKind::Transform) {
            continue;
        }
        if let Some(child_transform) = world.transforms.get_mut(child) {
            child_transform.parent = Some(entity);
        }
        update(world, child, visited, updated)?;
    }
    Ok(())
}

/// Inverts `matrix`, or returns `None` if it is singular or so close to
/// singular that the inverse overflows.
pub(crate) fn try_inverse(matrix: Mat4) -> Option<Mat4> {
    let det = matrix.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Transform;
    use crate::hierarchy::add_child;
    use glam::{Quat, Vec3};

    fn spawn(world: &mut World, transform: Transform) -> Entity {
        let e = world.create_entity().unwrap();
        world.insert(e, transform).unwrap();
        e
    }

    fn world_pos(world: &World, e: Entity) -> Vec3 {
        world.get::<Transform>(e).unwrap().world_translation()
    }

    #[test]
    fn root_world_matches_local() {
        let mut world = World::new();
        let e = spawn(&mut world, Transform::from_xyz(1.0, 2.0, 3.0));

        assert_eq!(propagate_transforms(&mut world).unwrap(), 1);

        let t = world.get::<Transform>(e).unwrap();
        assert!(!t.is_dirty());
        assert!((t.world_translation() - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert!(t.world().abs_diff_eq(t.local_matrix(), 1e-6));
        assert!((t.world() * t.world_to_local()).abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn rotation_propagates() {
        let mut world = World::new();
        let parent = spawn(
            &mut world,
            Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );
        let child = spawn(&mut world, Transform::from_xyz(0.0, 0.0, -1.0));
        add_child(&mut world, parent, child).unwrap();

        propagate_transforms(&mut world).unwrap();

        // After 90-degree Y rotation, local -Z maps to world -X
        assert!((world_pos(&world, child) - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn grandchild_inherits_full_chain() {
        let mut world = World::new();
        let root = spawn(&mut world, Transform::from_xyz(1.0, 0.0, 0.0));
        let mid = spawn(&mut world, Transform::from_xyz(0.0, 2.0, 0.0));
        let leaf = spawn(&mut world, Transform::from_xyz(0.0, 0.0, 3.0));
        add_child(&mut world, root, mid).unwrap();
        add_child(&mut world, mid, leaf).unwrap();

        assert_eq!(propagate_transforms(&mut world).unwrap(), 3);

        // root(1,0,0) + mid(0,2,0) + leaf(0,0,3) = (1,2,3)
        assert!((world_pos(&world, leaf) - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn child_before_parent_in_index_order() {
        let mut world = World::new();
        let child = spawn(&mut world, Transform::from_xyz(0.0, 1.0, 0.0));
        let parent = spawn(&mut world, Transform::from_xyz(5.0, 0.0, 0.0));
        add_child(&mut world, parent, child).unwrap();

        propagate_transforms(&mut world).unwrap();
        assert!((world_pos(&world, child) - Vec3::new(5.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut world = World::new();
        let root = spawn(&mut world, Transform::from_xyz(1.0, 0.0, 0.0));
        let child = spawn(
            &mut world,
            Transform::from_xyz(0.0, 1.0, 0.0).with_rotation(Quat::from_rotation_z(0.7)),
        );
        add_child(&mut world, root, child).unwrap();

        assert_eq!(propagate_transforms(&mut world).unwrap(), 2);
        let first: Vec<Mat4> = [root, child]
            .iter()
            .map(|&e| world.get::<Transform>(e).unwrap().world())
            .collect();

        assert_eq!(propagate_transforms(&mut world).unwrap(), 0);
        let second: Vec<Mat4> = [root, child]
            .iter()
            .map(|&e| world.get::<Transform>(e).unwrap().world())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn dirty_root_refreshes_clean_descendants() {
        let mut world = World::new();
        let a = spawn(&mut world, Transform::from_xyz(0.0, 0.0, 0.0));
        let b = spawn(&mut world, Transform::from_xyz(1.0, 0.0, 0.0));
        let c = spawn(&mut world, Transform::from_xyz(0.0, 1.0, 0.0));
        add_child(&mut world, a, b).unwrap();
        add_child(&mut world, b, c).unwrap();
        propagate_transforms(&mut world).unwrap();

        world
            .get_mut::<Transform>(a)
            .unwrap()
            .set_translation(Vec3::new(0.0, 0.0, 10.0));
        assert!(!world.get::<Transform>(b).unwrap().is_dirty());
        assert!(!world.get::<Transform>(c).unwrap().is_dirty());

        assert_eq!(propagate_transforms(&mut world).unwrap(), 3);
        assert!((world_pos(&world, b) - Vec3::new(1.0, 0.0, 10.0)).length() < 1e-6);
        assert!((world_pos(&world, c) - Vec3::new(1.0, 1.0, 10.0)).length() < 1e-6);
    }

    #[test]
    fn dirty_child_uses_cached_parent() {
        let mut world = World::new();
        let parent = spawn(&mut world, Transform::from_xyz(3.0, 0.0, 0.0));
        let child = spawn(&mut world, Transform::IDENTITY);
        add_child(&mut world, parent, child).unwrap();
        propagate_transforms(&mut world).unwrap();

        world
            .get_mut::<Transform>(child)
            .unwrap()
            .translate(Vec3::Y);
        assert_eq!(propagate_transforms(&mut world).unwrap(), 1);
        assert!((world_pos(&world, child) - Vec3::new(3.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn children_without_transform_are_skipped() {
        let mut world = World::new();
        let parent = spawn(&mut world, Transform::from_xyz(1.0, 0.0, 0.0));
        let bare = world.create_entity().unwrap();
        let child = spawn(&mut world, Transform::IDENTITY);
        add_child(&mut world, parent, bare).unwrap();
        add_child(&mut world, parent, child).unwrap();

        assert_eq!(propagate_transforms(&mut world).unwrap(), 2);
        assert!((world_pos(&world, child) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn tiny_scale_is_not_invertible() {
        let mut world = World::new();
        let e = spawn(&mut world, Transform::from_scale(Vec3::splat(1e-15)));
        assert_eq!(
            propagate_transforms(&mut world),
            Err(KernelError::NonInvertibleTransform(e))
        );
        // Never accepted with infinities in the cached inverse
        let t = world.get::<Transform>(e).unwrap();
        assert!(t.world_to_local().is_finite());
        assert!(!t.is_dirty());
    }

    #[test]
    fn points_round_trip_through_world_space() {
        let mut world = World::new();
        let parent = spawn(
            &mut world,
            Transform::from_xyz(2.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(0.8)),
        );
        let child = spawn(
            &mut world,
            Transform::from_xyz(0.0, 1.0, -3.0).with_scale(Vec3::splat(0.5)),
        );
        add_child(&mut world, parent, child).unwrap();
        propagate_transforms(&mut world).unwrap();

        let t = world.get::<Transform>(child).unwrap();
        assert!((t.transform_point(Vec3::ZERO) - t.world_translation()).length() < 1e-6);

        let local = Vec3::new(0.3, -1.2, 4.0);
        let back = t.inverse_transform_point(t.transform_point(local));
        assert!((back - local).length() < 1e-4);
    }

    #[test]
    fn zero_scale_is_not_invertible() {
        let mut world = World::new();
        let e = spawn(&mut world, Transform::from_scale(Vec3::ZERO));
        assert_eq!(
            propagate_transforms(&mut world),
            Err(KernelError::NonInvertibleTransform(e))
        );
    }
}
