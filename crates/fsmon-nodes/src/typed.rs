//! Role-restricted node registry

use crate::error::{NodesError, Result};
use crate::registry::Nodes;
use fsmon_types::{Node, NodeRole};

/// A [`Nodes`] registry that accepts only members of one declared role.
///
/// Foreign-role input is rejected without mutating the registry; inserts
/// never panic over it.
#[derive(Debug, Clone)]
pub struct TypedNodes {
    role: NodeRole,
    inner: Nodes,
}

impl TypedNodes {
    pub fn new(role: NodeRole) -> Self {
        Self {
            role,
            inner: Nodes::new(),
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Insert a node of the declared role. Returns false for a foreign
    /// role, leaving the registry unchanged.
    pub fn add(&self, node: Node) -> bool {
        if node.role() != self.role {
            tracing::warn!(
                expected = %self.role,
                actual = %node.role(),
                node = %node.string_id(),
                "rejected foreign-role insert"
            );
            return false;
        }
        self.inner.add(node)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.inner.contains(node)
    }

    pub fn contains_num_id(&self, num_id: u32) -> bool {
        self.inner.contains_num_id(num_id, self.role)
    }

    pub fn contains_string_id(&self, string_id: &str) -> bool {
        self.inner.contains_string_id(string_id, self.role)
    }

    pub fn get_by_num_id(&self, num_id: u32) -> Option<Node> {
        self.inner.get_by_num_id(num_id, self.role)
    }

    pub fn get_by_string_id(&self, string_id: &str) -> Option<Node> {
        self.inner.get_by_string_id(string_id, self.role)
    }

    pub fn remove(&self, node: &Node) -> bool {
        self.inner.remove(node)
    }

    pub fn remove_by_num_id(&self, num_id: u32) -> bool {
        self.inner.remove_by_num_id(num_id, self.role)
    }

    pub fn remove_by_string_id(&self, string_id: &str) -> bool {
        self.inner.remove_by_string_id(string_id, self.role)
    }

    pub fn filter_by_group(&self, group: &str) -> Nodes {
        self.inner.filter_by_group(group, self.role)
    }

    /// Add every member of `other` not already contained; returns the
    /// number of newly added nodes. A role mismatch fails before anything
    /// is applied.
    pub fn sync_from(&self, other: &TypedNodes) -> Result<usize> {
        if other.role != self.role {
            return Err(NodesError::role_mismatch(self.role, other.role));
        }
        self.inner.sync_from(&other.inner)
    }

    /// Merge all of `other` in. Returns false for a foreign role or when
    /// nothing new was found.
    pub fn union(&self, other: &TypedNodes) -> bool {
        if other.role != self.role {
            return false;
        }
        self.inner.union(&other.inner)
    }

    pub fn remove_all(&self, other: &TypedNodes) -> bool {
        self.inner.remove_all(&other.inner)
    }

    pub fn remove_group(&self, group: &str) -> bool {
        self.inner.remove_group(group)
    }

    pub fn to_vec(&self) -> Vec<Node> {
        self.inner.to_vec()
    }
}
