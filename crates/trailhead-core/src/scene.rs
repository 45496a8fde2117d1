//! Minimal visual scene arena.
//!
//! The renderer is an external collaborator; all the simulation needs is a
//! place to write node transforms. Physics writes the transforms of linked
//! bodies, the vehicle writes its chassis and wheel nodes, and nothing else
//! touches node state.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a node inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// A transformable visual node. Child transforms are relative to the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node at `position`.
    pub fn add(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        self.push(SceneNode {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
            parent: None,
        })
    }

    /// Add a node positioned relative to `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>, offset: Vec3) -> NodeId {
        self.push(SceneNode {
            name: name.into(),
            position: offset,
            rotation: Quat::IDENTITY,
            parent: Some(parent),
        })
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Overwrite position and orientation. Unknown ids are ignored.
    pub fn set_transform(&mut self, id: NodeId, position: Vec3, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.position = position;
            node.rotation = rotation;
        }
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.rotation = rotation;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
