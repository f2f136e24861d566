//! Named transform hierarchy.
//!
//! Every part owns a root [`TransformNode`]; children are owned by their
//! parent node. Searches are depth-first and pre-order: a node is checked
//! before any of its descendants, and siblings are visited in insertion order.

use cgmath::Vector3;

use crate::{data_structures::instance::Instance, resources::config::Axis};

/// Suffix the host engine appends to the names of cloned model instances.
pub const CLONE_SUFFIX: &str = "(Clone)";

#[derive(Clone, Debug)]
pub struct TransformNode {
    pub name: String,
    pub local: Instance,
    pub world: Instance,
    pub children: Vec<TransformNode>,
}

impl TransformNode {
    /// A node at the identity local transform with no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Instance::new(),
            world: Instance::new(),
            children: Vec::new(),
        }
    }

    pub fn with_local(name: impl Into<String>, local: Instance) -> Self {
        Self {
            local,
            ..Self::new(name)
        }
    }

    pub fn add_child(&mut self, child: TransformNode) -> &mut TransformNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// First node named `name`, starting with `self`.
    pub fn find_recursive(&self, name: &str) -> Option<&TransformNode> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_recursive(name))
    }

    pub fn find_recursive_mut(&mut self, name: &str) -> Option<&mut TransformNode> {
        let path = self.locate(name)?;
        Some(self.node_at_mut(&path))
    }

    /// Every node named `name` in pre-order, `self` included.
    pub fn find_children(&self, name: &str) -> Vec<&TransformNode> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }

    /// Like [`find_recursive`](Self::find_recursive), falling back to the
    /// cloned-instance name.
    pub fn find_model(&self, model_name: &str) -> Option<&TransformNode> {
        self.find_recursive(model_name)
            .or_else(|| self.find_recursive(&format!("{model_name}{CLONE_SUFFIX}")))
    }

    /// All nodes named `model_name`, followed by all nodes named
    /// `model_name` + [`CLONE_SUFFIX`].
    pub fn find_models(&self, model_name: &str) -> Vec<&TransformNode> {
        self.find_models_with_suffix(model_name, CLONE_SUFFIX)
    }

    /// Plain matches first, suffixed matches second; a node appears once.
    pub fn find_models_with_suffix(&self, model_name: &str, suffix: &str) -> Vec<&TransformNode> {
        let plain = self.find_children(model_name);
        let suffixed = self.find_children(&format!("{model_name}{suffix}"));
        let mut models: Vec<&TransformNode> = Vec::with_capacity(plain.len() + suffixed.len());
        for node in plain.into_iter().chain(suffixed) {
            if !models.iter().any(|seen| std::ptr::eq(*seen, node)) {
                models.push(node);
            }
        }
        models
    }

    /// Returns the first node named `name`, creating it as a direct child at
    /// the identity local transform when there is none.
    pub fn find_or_create(&mut self, name: &str) -> &mut TransformNode {
        match self.locate(name) {
            Some(path) => self.node_at_mut(&path),
            None => {
                log::debug!("Creating transform '{}' under '{}'", name, self.name);
                let mut node = TransformNode::new(name);
                node.world = &self.world * &node.local;
                self.add_child(node)
            }
        }
    }

    /// Every descendant in pre-order, excluding `self`.
    pub fn all_children(&self) -> Vec<&TransformNode> {
        let mut nodes = Vec::new();
        collect_descendants(self, &mut nodes);
        nodes
    }

    /// True when `node` is a direct child of `self`, or with `check_upwards`
    /// any descendant.
    pub fn is_parent_of(&self, node: &TransformNode, check_upwards: bool) -> bool {
        if self.children.iter().any(|child| std::ptr::eq(child, node)) {
            return true;
        }
        check_upwards
            && self
                .all_children()
                .into_iter()
                .any(|descendant| std::ptr::eq(descendant, node))
    }

    /// World-space direction of `axis` for this node.
    pub fn world_axis(&self, axis: Axis) -> Vector3<f32> {
        self.world.axis(axis)
    }

    /// Recomputes `world = parent * local` for this node and everything below it.
    pub fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world.clone();
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    /// Child-index path from `self` to the first node named `name`.
    fn locate(&self, name: &str) -> Option<Vec<usize>> {
        if self.name == name {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(idx, child)| {
            child.locate(name).map(|mut path| {
                path.insert(0, idx);
                path
            })
        })
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut TransformNode {
        path.iter()
            .fold(self, |node, &idx| &mut node.children[idx])
    }
}

fn collect_named<'a>(node: &'a TransformNode, name: &str, output: &mut Vec<&'a TransformNode>) {
    if node.name == name {
        output.push(node);
    }
    for child in &node.children {
        collect_named(child, name, output);
    }
}

fn collect_descendants<'a>(node: &'a TransformNode, output: &mut Vec<&'a TransformNode>) {
    for child in &node.children {
        output.push(child);
        collect_descendants(child, output);
    }
}
