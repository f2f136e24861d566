#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use part_ngin::{
    Assembly, AttachPointId, Instance, PartId, Quaternion, Vector3,
    attach::{create_attach_point, create_surface_attach_point},
    data_structures::part::MountFace,
};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn assert_vec3_eq(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-5);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-5);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = 1e-5);
}

pub(crate) fn world_position(assembly: &Assembly, part: PartId) -> Vector3<f32> {
    assembly.part(part).unwrap().transform.position
}

pub(crate) fn part_at(
    assembly: &mut Assembly,
    name: &str,
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
) -> PartId {
    assembly.add_part(name, Instance::from_position_rotation(position, rotation))
}

/// A parent/child stack connection: parent's `top` point holds the child's
/// `bottom` point.
pub(crate) struct StackPair {
    pub assembly: Assembly,
    pub parent: PartId,
    pub child: PartId,
    pub parent_top: AttachPointId,
    pub child_bottom: AttachPointId,
}

pub(crate) fn stack_pair(parent_transform: Instance, child_position: Vector3<f32>) -> StackPair {
    let mut assembly = Assembly::new();
    let parent = assembly.add_part("tank", parent_transform);
    let child = assembly.add_part("engine", Instance::from(child_position));
    let parent_top = create_attach_point(
        &mut assembly,
        parent,
        "top",
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        2,
    )
    .unwrap();
    let child_bottom = create_attach_point(
        &mut assembly,
        child,
        "bottom",
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        2,
    )
    .unwrap();
    assembly
        .connect(parent, parent_top, child, child_bottom)
        .unwrap();
    StackPair {
        assembly,
        parent,
        child,
        parent_top,
        child_bottom,
    }
}

pub(crate) fn surface_mount(
    assembly: &mut Assembly,
    parent: PartId,
    name: &str,
    position: Vector3<f32>,
    face: MountFace,
) -> PartId {
    let child = assembly.add_part(name, Instance::from(position));
    create_surface_attach_point(
        assembly,
        child,
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        face,
    )
    .unwrap();
    assembly.surface_attach(parent, child).unwrap();
    child
}
