//! Attach point repositioning, lifecycle and radial offsetting.
//!
//! These are plain functions over an [`Assembly`]; every one of them completes
//! within the call and mutates the assembly in place. Unknown handles are
//! logged and ignored.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::data_structures::{
    part::{Assembly, AttachNodeType, AttachPoint, AttachPointId, MountFace, PartId},
    snapshot::AttachPointSnapshot,
};

/// Which surface-mounted children a diameter change displaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceMountPolicy {
    /// Every surface-attached child is moved radially, whatever face it sits on.
    #[default]
    AllChildren,
    /// Only children mounted on the side face are moved.
    SideOnly,
}

impl FaceMountPolicy {
    fn admits(self, face: MountFace) -> bool {
        match self {
            FaceMountPolicy::AllChildren => true,
            FaceMountPolicy::SideOnly => face == MountFace::Side,
        }
    }
}

/// Resets `point` to the given state and, when `propagate` is set, moves
/// whatever is attached to it by the change in position.
///
/// An attached child moves with the point. An attached parent cannot be moved
/// by its child, so `part` moves the opposite way instead and the assembly
/// root is shifted back to keep `part` where it was.
pub fn reposition_attach_point(
    assembly: &mut Assembly,
    part: PartId,
    point: AttachPointId,
    position: Vector3<f32>,
    orientation: Vector3<f32>,
    size: i32,
    propagate: bool,
) {
    let Some(attach_point) = assembly.attach_point_mut(point) else {
        log::error!("Cannot reposition unknown attach point {:?}", point);
        return;
    };
    let diff = position - attach_point.position;
    attach_point.position = position;
    attach_point.original_position = position;
    attach_point.orientation = orientation;
    attach_point.original_orientation = orientation;
    attach_point.size = size;
    let attached = attach_point.attached_part;

    let Some(attached) = attached.filter(|_| propagate) else {
        return;
    };
    let Some(owner) = assembly.part(part) else {
        log::error!("Cannot reposition attach point of unknown part {:?}", part);
        return;
    };
    let global_diff = owner.transform.transform_vector(diff);

    if assembly.parent(attached) == Some(part) {
        if let Some(child) = assembly.part_mut(attached) {
            child.local_offset += diff;
        }
        assembly.translate(attached, global_diff);
    } else {
        if let Some(owner) = assembly.part_mut(part) {
            owner.local_offset -= diff;
        }
        assembly.translate(part, -global_diff);
        if let Some(root) = assembly.local_root(part).filter(|&root| root != part) {
            assembly.translate(root, global_diff);
        }
    }
}

/// Creates a stack attach point on `part` with identical current and original state.
pub fn create_attach_point(
    assembly: &mut Assembly,
    part: PartId,
    id: &str,
    position: Vector3<f32>,
    orientation: Vector3<f32>,
    size: i32,
) -> Option<AttachPointId> {
    if assembly.part(part).is_none() {
        log::error!("Cannot create attach point '{}' on unknown part {:?}", id, part);
        return None;
    }
    let mut point = AttachPoint::new(id, AttachNodeType::Stack, position, orientation, size);
    point.owner = Some(part);
    let handle = assembly.insert_attach_point(point);
    if let Some(owner) = assembly.part_mut(part) {
        owner.attach_points.push(handle);
    }
    Some(handle)
}

pub fn create_attach_point_from_snapshot(
    assembly: &mut Assembly,
    part: PartId,
    id: &str,
    snapshot: &AttachPointSnapshot,
) -> Option<AttachPointId> {
    create_attach_point(
        assembly,
        part,
        id,
        snapshot.position(),
        snapshot.orientation(),
        snapshot.size(),
    )
}

/// Gives `part` a surface attach point, replacing any previous one.
pub fn create_surface_attach_point(
    assembly: &mut Assembly,
    part: PartId,
    position: Vector3<f32>,
    orientation: Vector3<f32>,
    mount_face: MountFace,
) -> Option<AttachPointId> {
    let previous = assembly.part(part)?.surface_attach_point;
    if let Some(previous) = previous {
        destroy_attach_point(assembly, part, Some(previous));
    }
    let mut point =
        AttachPoint::new("srfAttach", AttachNodeType::Surface, position, orientation, 1);
    point.owner = Some(part);
    point.mount_face = mount_face;
    let handle = assembly.insert_attach_point(point);
    if let Some(owner) = assembly.part_mut(part) {
        owner.surface_attach_point = Some(handle);
    }
    Some(handle)
}

/// Removes `point` from `part` and returns it detached from its owner.
///
/// A point that still has an attached part is removed anyway, after an error
/// is logged. `None` is a no-op.
pub fn destroy_attach_point(
    assembly: &mut Assembly,
    part: PartId,
    point: Option<AttachPointId>,
) -> Option<AttachPoint> {
    let point = point?;
    let Some(attach_point) = assembly.attach_point(point) else {
        log::warn!("Attach point {:?} was already destroyed", point);
        return None;
    };
    if attach_point.owner != Some(part) {
        log::error!(
            "Attach point '{}' does not belong to part {:?}",
            attach_point.id,
            part
        );
        return None;
    }
    if let Some(attached) = attach_point.attached_part {
        let attached_name = assembly
            .part(attached)
            .map(|p| p.name.as_str())
            .unwrap_or("<unknown>");
        log::error!(
            "Deleting attach point '{}' with attached part '{}'",
            attach_point.id,
            attached_name
        );
    }
    if let Some(owner) = assembly.part_mut(part) {
        owner.attach_points.retain(|&p| p != point);
        if owner.surface_attach_point == Some(point) {
            owner.surface_attach_point = None;
        }
    }
    let mut removed = assembly.remove_attach_point(point)?;
    removed.owner = None;
    if let Some(icon) = removed.icon.take() {
        log::debug!("Released marker '{}' of attach point '{}'", icon.name, removed.id);
    }
    Some(removed)
}

/// Moves the surface-attached children of `part` radially by half the change
/// in diameter.
///
/// The direction is taken in `part`'s horizontal plane, from its centerline
/// out to the child. With [`FaceMountPolicy::AllChildren`] children on the
/// top and bottom faces are displaced by the same formula.
pub fn update_surface_attached_children(
    assembly: &mut Assembly,
    part: PartId,
    old_diameter: f32,
    new_diameter: f32,
    policy: FaceMountPolicy,
) {
    let delta = (new_diameter - old_diameter) / 2.0;
    let Some(parent_local) = assembly.local_position(part) else {
        log::error!("Cannot offset surface children of unknown part {:?}", part);
        return;
    };
    let children = assembly.children(part).to_vec();
    for child in children {
        let Some(face) = surface_mount_face(assembly, child, part) else {
            continue;
        };
        if !policy.admits(face) {
            continue;
        }
        let (Some(parent), Some(child_part)) = (assembly.part(part), assembly.part(child)) else {
            continue;
        };
        let child_in_parent = parent
            .transform
            .inverse_transform_point(child_part.transform.position);
        let mut dir = child_in_parent - parent_local;
        dir.y = 0.0;
        let dir = if dir.magnitude2() > f32::EPSILON {
            dir.normalize()
        } else {
            Vector3::zero()
        };
        let world_dir = parent.transform.transform_direction(dir);
        assembly.translate(child, world_dir * delta);
        if let Some(offset) = assembly.local_position(child) {
            if let Some(child_part) = assembly.part_mut(child) {
                child_part.local_offset = offset;
            }
        }
    }
}

/// Mount face of `child`'s surface attach point when it is attached to `parent`.
fn surface_mount_face(assembly: &Assembly, child: PartId, parent: PartId) -> Option<MountFace> {
    let point = assembly.part(child)?.surface_attach_point?;
    let attach_point = assembly.attach_point(point)?;
    (attach_point.attached_part == Some(parent)).then_some(attach_point.mount_face)
}
