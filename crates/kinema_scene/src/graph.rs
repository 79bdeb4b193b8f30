//! Transform node arena.
//!
//! Nodes live in a [`SlotMap`] and refer to their dependency by key. A node's
//! dependency must already be in the graph when the node is inserted, so
//! insertion order is a valid update order: every dependency is updated
//! before its dependents.

use glam::Mat4;
use kinema_core::{KinemaError, Result};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::node::TransformNode;

new_key_type! {
    pub struct NodeKey;
}

#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: SlotMap<NodeKey, TransformNode>,
    ids: FxHashMap<String, NodeKey>,
    order: Vec<NodeKey>,
}

impl TransformGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty node and runs its first update against the dependency.
    pub fn insert(&mut self, id: impl Into<String>, dependency: Option<NodeKey>) -> Result<NodeKey> {
        let id = id.into();
        if self.ids.contains_key(&id) {
            return Err(KinemaError::DuplicateNode(id));
        }
        if let Some(dep) = dependency
            && !self.nodes.contains_key(dep)
        {
            return Err(KinemaError::NodeNotFound);
        }

        let key = self.nodes.insert(TransformNode::new(id.clone(), dependency));
        self.ids.insert(id, key);
        self.order.push(key);
        if dependency.is_some() {
            self.update(key)?;
        }
        Ok(key)
    }

    /// World matrices of the node `key` depends on.
    fn dependency_matrices(&self, key: NodeKey) -> Option<(Mat4, Mat4)> {
        let dep = self.nodes.get(key)?.dependency()?;
        self.nodes
            .get(dep)
            .map(|n| (n.get_matrix(), n.get_inverse_matrix()))
    }

    /// Updates a single node against its dependency's current matrices.
    pub fn update(&mut self, key: NodeKey) -> Result<bool> {
        let dependency = self.dependency_matrices(key);
        let node = self.nodes.get_mut(key).ok_or(KinemaError::NodeNotFound)?;
        Ok(node.update(dependency.as_ref().map(|(m, inv)| (m, inv))))
    }

    /// Updates every node, dependencies first. Returns how many changed.
    pub fn update_all(&mut self) -> usize {
        let order = std::mem::take(&mut self.order);
        let changed = order
            .iter()
            .filter(|&&key| matches!(self.update(key), Ok(true)))
            .count();
        log::trace!("Updated {} transform nodes, {changed} changed", order.len());
        self.order = order;
        changed
    }

    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&TransformNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut TransformNode> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeKey> {
        self.ids.get(id).copied()
    }

    /// Removes a node that nothing depends on, releasing its listeners.
    pub fn remove(&mut self, key: NodeKey) -> Result<TransformNode> {
        let node = self.nodes.get(key).ok_or(KinemaError::NodeNotFound)?;
        if self.nodes.values().any(|n| n.dependency() == Some(key)) {
            return Err(KinemaError::NodeHasDependents(node.id().to_string()));
        }

        let node = self.nodes.remove(key).ok_or(KinemaError::NodeNotFound)?;
        self.ids.remove(node.id());
        self.order.retain(|&k| k != key);
        Ok(node)
    }

    /// Nodes in update order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &TransformNode)> {
        self.order.iter().filter_map(|&k| self.nodes.get(k).map(|n| (k, n)))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
