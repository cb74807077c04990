//! Node registry with set-style merge operations

use crate::error::Result;
use dashmap::DashMap;
use fsmon_types::{Node, NodeRole};

/// Map key covering exactly the node identity fields, so two nodes that
/// compare equal always collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NodeKey {
    role: NodeRole,
    num_id: u32,
    string_id: String,
}

impl NodeKey {
    fn of(node: &Node) -> Self {
        Self {
            role: node.role(),
            num_id: node.num_id(),
            string_id: node.string_id().to_string(),
        }
    }
}

/// An unordered, duplicate-free collection of [`Node`].
///
/// Internally synchronized: reads and writes from any number of tasks are
/// safe, and iteration works on cloned-out snapshots so readers never hold
/// the map locked across their own code.
#[derive(Debug, Default)]
pub struct Nodes {
    members: DashMap<NodeKey, Node>,
}

impl Nodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert a node. Returns true when the registry contains the node
    /// afterwards; a duplicate is silently absorbed and the existing entry
    /// kept.
    pub fn add(&self, node: Node) -> bool {
        self.members.entry(NodeKey::of(&node)).or_insert(node);
        true
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.members.contains_key(&NodeKey::of(node))
    }

    pub fn contains_num_id(&self, num_id: u32, role: NodeRole) -> bool {
        self.get_by_num_id(num_id, role).is_some()
    }

    pub fn contains_string_id(&self, string_id: &str, role: NodeRole) -> bool {
        self.get_by_string_id(string_id, role).is_some()
    }

    pub fn get_by_num_id(&self, num_id: u32, role: NodeRole) -> Option<Node> {
        self.members
            .iter()
            .find(|entry| entry.key().role == role && entry.key().num_id == num_id)
            .map(|entry| entry.value().clone())
    }

    pub fn get_by_string_id(&self, string_id: &str, role: NodeRole) -> Option<Node> {
        self.members
            .iter()
            .find(|entry| entry.key().role == role && entry.key().string_id == string_id)
            .map(|entry| entry.value().clone())
    }

    /// Remove one node. Returns true iff a matching member was found.
    pub fn remove(&self, node: &Node) -> bool {
        self.members.remove(&NodeKey::of(node)).is_some()
    }

    pub fn remove_by_num_id(&self, num_id: u32, role: NodeRole) -> bool {
        self.remove_where(|key| key.role == role && key.num_id == num_id)
    }

    pub fn remove_by_string_id(&self, string_id: &str, role: NodeRole) -> bool {
        self.remove_where(|key| key.role == role && key.string_id == string_id)
    }

    fn remove_where(&self, matches: impl Fn(&NodeKey) -> bool) -> bool {
        let keys: Vec<NodeKey> = self
            .members
            .iter()
            .filter(|entry| matches(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = false;
        for key in keys {
            removed |= self.members.remove(&key).is_some();
        }
        removed
    }

    /// Copy out all members of one group and role. The result owns its
    /// nodes, so it stays valid however long the consumer keeps it.
    pub fn filter_by_group(&self, group: &str, role: NodeRole) -> Nodes {
        let filtered = Nodes::new();
        for node in self.to_vec() {
            if node.role() == role && node.group() == group {
                filtered.add(node);
            }
        }
        filtered
    }

    /// Add every member of `other` that is not already contained. Returns
    /// the number of newly added nodes. Applying the same sync twice adds
    /// nothing the second time.
    pub fn sync_from(&self, other: &Nodes) -> Result<usize> {
        let mut added = 0;
        for node in other.to_vec() {
            if !self.contains(&node) {
                self.add(node);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Merge all of `other` in. Returns false when nothing new was found.
    pub fn union(&self, other: &Nodes) -> bool {
        self.sync_from(other).map(|added| added > 0).unwrap_or(false)
    }

    /// Remove every member of `other`. Returns false when nothing matched.
    pub fn remove_all(&self, other: &Nodes) -> bool {
        let mut removed = false;
        for node in other.to_vec() {
            removed |= self.remove(&node);
        }
        removed
    }

    /// Remove every member of one group. Returns false when nothing matched.
    pub fn remove_group(&self, group: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|_, node| node.group() != group);
        self.members.len() < before
    }

    /// Snapshot of the current membership.
    pub fn to_vec(&self) -> Vec<Node> {
        self.members
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Clone for Nodes {
    fn clone(&self) -> Self {
        let copy = Nodes::new();
        for node in self.to_vec() {
            copy.add(node);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(num_id: u32, string_id: &str) -> Node {
        Node::with_default_group(num_id, string_id, NodeRole::Storage)
    }

    #[test]
    fn test_add_absorbs_duplicates() {
        let nodes = Nodes::new();

        assert!(nodes.add(storage(1, "storA")));
        assert!(nodes.add(storage(1, "storA")));
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_duplicate_in_other_group_is_absorbed() {
        let nodes = Nodes::new();
        nodes.add(storage(1, "storA"));
        nodes.add(Node::new(1, "storA", "rack-2", NodeRole::Storage));

        assert_eq!(nodes.len(), 1);
        // the first entry wins
        let kept = nodes.get_by_num_id(1, NodeRole::Storage).unwrap();
        assert_eq!(kept.group(), "Default");
    }

    #[test]
    fn test_distinct_nodes_all_kept() {
        let nodes = Nodes::new();
        nodes.add(storage(1, "storA"));
        nodes.add(storage(2, "storA"));
        nodes.add(storage(1, "storB"));
        nodes.add(Node::with_default_group(1, "storA", NodeRole::Metadata));

        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_keyed_lookup() {
        let nodes = Nodes::new();
        nodes.add(storage(3, "stor03"));

        assert!(nodes.contains_num_id(3, NodeRole::Storage));
        assert!(!nodes.contains_num_id(3, NodeRole::Metadata));
        assert_eq!(
            nodes
                .get_by_string_id("stor03", NodeRole::Storage)
                .unwrap()
                .num_id(),
            3
        );
        assert!(nodes.get_by_string_id("stor04", NodeRole::Storage).is_none());
    }

    #[test]
    fn test_remove_by_key() {
        let nodes = Nodes::new();
        nodes.add(storage(1, "storA"));
        nodes.add(storage(2, "storB"));

        assert!(nodes.remove_by_num_id(1, NodeRole::Storage));
        assert!(!nodes.remove_by_num_id(1, NodeRole::Storage));
        assert!(nodes.remove_by_string_id("storB", NodeRole::Storage));
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_sync_from_is_idempotent() {
        let live = Nodes::new();
        live.add(storage(1, "storA"));

        let incoming = Nodes::new();
        incoming.add(storage(1, "storA"));
        incoming.add(storage(2, "storB"));

        assert_eq!(live.sync_from(&incoming).unwrap(), 1);
        assert_eq!(live.sync_from(&incoming).unwrap(), 0);
        assert_eq!(live.len(), 2);
    }

    #[test]
    fn test_union_reports_no_op() {
        let live = Nodes::new();
        live.add(storage(1, "storA"));

        let same = Nodes::new();
        same.add(storage(1, "storA"));

        assert!(!live.union(&same));

        let more = Nodes::new();
        more.add(storage(2, "storB"));
        assert!(live.union(&more));
        assert_eq!(live.len(), 2);
    }

    #[test]
    fn test_remove_all() {
        let live = Nodes::new();
        live.add(storage(1, "storA"));
        live.add(storage(2, "storB"));

        let gone = Nodes::new();
        gone.add(storage(2, "storB"));
        gone.add(storage(9, "storX"));

        assert!(live.remove_all(&gone));
        assert_eq!(live.len(), 1);
        assert!(!live.remove_all(&gone));
    }

    #[test]
    fn test_filter_by_group_copies() {
        let nodes = Nodes::new();
        nodes.add(Node::new(1, "storA", "rack-1", NodeRole::Storage));
        nodes.add(Node::new(2, "storB", "rack-2", NodeRole::Storage));
        nodes.add(Node::new(3, "meta01", "rack-1", NodeRole::Metadata));

        let rack1 = nodes.filter_by_group("rack-1", NodeRole::Storage);
        assert_eq!(rack1.len(), 1);
        assert!(rack1.contains_num_id(1, NodeRole::Storage));

        // the copy is independent of the source registry
        nodes.remove_by_num_id(1, NodeRole::Storage);
        assert_eq!(rack1.len(), 1);
    }

    #[test]
    fn test_remove_group() {
        let nodes = Nodes::new();
        nodes.add(Node::new(1, "storA", "rack-1", NodeRole::Storage));
        nodes.add(Node::new(2, "storB", "rack-2", NodeRole::Storage));

        assert!(nodes.remove_group("rack-1"));
        assert_eq!(nodes.len(), 1);
        assert!(!nodes.remove_group("rack-1"));
    }
}
