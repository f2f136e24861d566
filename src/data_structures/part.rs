//! Parts, attach points and the assembly arena that owns them.
//!
//! Parts form a rooted tree through `parent`/`children` handles. Attach points
//! live in their own arena and refer to the part they are connected to by
//! handle only, so the cyclic part <-> attach point relations never own each
//! other.
//!
//! Every part carries a world transform. Moving a part through
//! [`Assembly::translate`] moves its structural subtree with it, the same way
//! moving a transform moves its children.

use cgmath::Vector3;
use slotmap::SlotMap;

use crate::{
    data_structures::{instance::Instance, scene_graph::TransformNode},
    error::AssemblyError,
};

slotmap::new_key_type! {
    /// Stable handle of a part inside an [`Assembly`].
    pub struct PartId;
    /// Stable handle of an attach point inside an [`Assembly`].
    pub struct AttachPointId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttachNodeType {
    #[default]
    Stack,
    Surface,
}

/// Which face of its parent a surface-mounted part sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MountFace {
    #[default]
    Side,
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct AttachPoint {
    pub id: String,
    pub owner: Option<PartId>,
    pub node_type: AttachNodeType,
    pub position: Vector3<f32>,
    pub original_position: Vector3<f32>,
    pub orientation: Vector3<f32>,
    pub original_orientation: Vector3<f32>,
    pub size: i32,
    pub attached_part: Option<PartId>,
    pub mount_face: MountFace,
    /// Editor marker shown at the point's location.
    pub icon: Option<TransformNode>,
}

impl AttachPoint {
    pub fn new(
        id: impl Into<String>,
        node_type: AttachNodeType,
        position: Vector3<f32>,
        orientation: Vector3<f32>,
        size: i32,
    ) -> Self {
        Self {
            id: id.into(),
            owner: None,
            node_type,
            position,
            original_position: position,
            orientation,
            original_orientation: orientation,
            size,
            attached_part: None,
            mount_face: MountFace::default(),
            icon: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Part {
    pub name: String,
    pub parent: Option<PartId>,
    pub children: Vec<PartId>,
    pub attach_points: Vec<AttachPointId>,
    pub surface_attach_point: Option<AttachPointId>,
    /// Cached offset from the structural parent, kept in step with `transform`.
    pub local_offset: Vector3<f32>,
    /// World transform.
    pub transform: Instance,
    pub model: TransformNode,
    pub symmetry_counterparts: Vec<PartId>,
}

impl Part {
    pub fn new(name: impl Into<String>, transform: Instance) -> Self {
        let name = name.into();
        let mut model = TransformNode::new("model");
        model.update_world_transforms(&transform);
        Self {
            name,
            parent: None,
            children: Vec::new(),
            attach_points: Vec::new(),
            surface_attach_point: None,
            local_offset: transform.position,
            transform,
            model,
            symmetry_counterparts: Vec::new(),
        }
    }

    /// Recomputes the world transforms of the part's model hierarchy.
    pub fn sync_model(&mut self) {
        let transform = self.transform.clone();
        self.model.update_world_transforms(&transform);
    }
}

#[derive(Debug, Default)]
pub struct Assembly {
    parts: SlotMap<PartId, Part>,
    points: SlotMap<AttachPointId, AttachPoint>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unconnected part at the given world transform.
    pub fn add_part(&mut self, name: impl Into<String>, transform: Instance) -> PartId {
        self.parts.insert(Part::new(name, transform))
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id)
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.get_mut(id)
    }

    pub fn parts(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.parts.iter()
    }

    pub fn attach_point(&self, id: AttachPointId) -> Option<&AttachPoint> {
        self.points.get(id)
    }

    pub fn attach_point_mut(&mut self, id: AttachPointId) -> Option<&mut AttachPoint> {
        self.points.get_mut(id)
    }

    /// Finds a stack attach point of `part` by its id string.
    pub fn find_attach_point(&self, part: PartId, id: &str) -> Option<AttachPointId> {
        self.parts.get(part)?.attach_points.iter().copied().find(|&point| {
            self.points
                .get(point)
                .is_some_and(|attach_point| attach_point.id == id)
        })
    }

    pub(crate) fn insert_attach_point(&mut self, point: AttachPoint) -> AttachPointId {
        self.points.insert(point)
    }

    pub(crate) fn remove_attach_point(&mut self, id: AttachPointId) -> Option<AttachPoint> {
        self.points.remove(id)
    }

    pub fn parent(&self, id: PartId) -> Option<PartId> {
        self.parts.get(id)?.parent
    }

    pub fn children(&self, id: PartId) -> &[PartId] {
        self.parts
            .get(id)
            .map(|part| part.children.as_slice())
            .unwrap_or(&[])
    }

    /// The root of the assembly `id` belongs to.
    pub fn local_root(&self, id: PartId) -> Option<PartId> {
        let mut current = id;
        let mut steps = 0;
        self.parts.get(current)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
            steps += 1;
            if steps > self.parts.len() {
                log::error!("Cycle in part hierarchy while searching the root of {:?}", id);
                return None;
            }
        }
        Some(current)
    }

    /// Moves `id` and its whole structural subtree by `delta` in world space.
    pub fn translate(&mut self, id: PartId, delta: Vector3<f32>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(part) = self.parts.get_mut(current) {
                part.transform.translate(delta);
                part.sync_model();
                stack.extend(part.children.iter().copied());
            }
        }
    }

    /// Position of `id` in its structural parent's frame, or its world
    /// position for a root part.
    pub fn local_position(&self, id: PartId) -> Option<Vector3<f32>> {
        let part = self.parts.get(id)?;
        let position = match part.parent.and_then(|parent| self.parts.get(parent)) {
            Some(parent) => parent.transform.inverse_transform_point(part.transform.position),
            None => part.transform.position,
        };
        Some(position)
    }

    /// Stack-connects `child` below `parent` through one attach point on each side.
    pub fn connect(
        &mut self,
        parent: PartId,
        parent_point: AttachPointId,
        child: PartId,
        child_point: AttachPointId,
    ) -> Result<(), AssemblyError> {
        self.check_point(parent, parent_point)?;
        self.check_point(child, child_point)?;
        self.set_parent(child, parent)?;
        if let Some(point) = self.points.get_mut(parent_point) {
            point.attached_part = Some(child);
        }
        if let Some(point) = self.points.get_mut(child_point) {
            point.attached_part = Some(parent);
        }
        Ok(())
    }

    /// Mounts `child` on the surface of `parent` through the child's surface
    /// attach point.
    pub fn surface_attach(&mut self, parent: PartId, child: PartId) -> Result<(), AssemblyError> {
        let point = self
            .parts
            .get(child)
            .ok_or(AssemblyError::UnknownPart(child))?
            .surface_attach_point
            .ok_or(AssemblyError::NoSurfaceAttachPoint(child))?;
        self.check_point(child, point)?;
        self.set_parent(child, parent)?;
        if let Some(point) = self.points.get_mut(point) {
            point.attached_part = Some(parent);
        }
        Ok(())
    }

    /// Records `members` as symmetry counterparts of each other.
    pub fn link_symmetry(&mut self, members: &[PartId]) {
        for &member in members {
            if let Some(part) = self.parts.get_mut(member) {
                part.symmetry_counterparts = members
                    .iter()
                    .copied()
                    .filter(|&other| other != member)
                    .collect();
            }
        }
    }

    pub fn symmetry_counterparts(&self, id: PartId) -> &[PartId] {
        self.parts
            .get(id)
            .map(|part| part.symmetry_counterparts.as_slice())
            .unwrap_or(&[])
    }

    fn check_point(&self, part: PartId, point: AttachPointId) -> Result<(), AssemblyError> {
        let attach_point = self
            .points
            .get(point)
            .ok_or(AssemblyError::UnknownAttachPoint(point))?;
        if attach_point.owner != Some(part) {
            return Err(AssemblyError::NotOwnedBy { point, part });
        }
        if attach_point.attached_part.is_some() {
            return Err(AssemblyError::AlreadyAttached(attach_point.id.clone()));
        }
        Ok(())
    }

    fn set_parent(&mut self, child: PartId, parent: PartId) -> Result<(), AssemblyError> {
        if !self.parts.contains_key(parent) {
            return Err(AssemblyError::UnknownPart(parent));
        }
        if !self.parts.contains_key(child) {
            return Err(AssemblyError::UnknownPart(child));
        }
        if self.local_root(parent).is_none() || self.is_ancestor(child, parent) {
            return Err(AssemblyError::Cycle { parent, child });
        }
        if let Some(old_parent) = self.parent(child) {
            if let Some(old) = self.parts.get_mut(old_parent) {
                old.children.retain(|&c| c != child);
            }
        }
        if let Some(parent_part) = self.parts.get_mut(parent) {
            parent_part.children.push(child);
        }
        let parent_transform = self.parts[parent].transform.clone();
        let part = &mut self.parts[child];
        part.parent = Some(parent);
        part.local_offset = parent_transform.inverse_transform_point(part.transform.position);
        Ok(())
    }

    /// True when `ancestor` is `id` or lies on the path from `id` to its root.
    fn is_ancestor(&self, ancestor: PartId, id: PartId) -> bool {
        let mut current = Some(id);
        while let Some(part) = current {
            if part == ancestor {
                return true;
            }
            current = self.parent(part);
        }
        false
    }
}
