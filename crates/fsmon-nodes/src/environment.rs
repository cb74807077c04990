//! Shared view of the cluster membership

use crate::error::Result;
use crate::typed::TypedNodes;
use fsmon_types::{Node, NodeRole};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Owns one typed registry per cluster role plus the "new data" doorbell
/// that wakes consumers when a merge cycle changed something.
///
/// Mutation discipline: only the poller writes to the registries; any
/// number of consumers read them, with or without waiting on the doorbell.
/// The registries are internally synchronized, so reading them never
/// requires holding anything else.
///
/// The doorbell carries no payload. A woken consumer re-reads whichever
/// registries it is interested in.
#[derive(Debug)]
pub struct NodeEnvironment {
    mgmtd_nodes: TypedNodes,
    meta_nodes: TypedNodes,
    storage_nodes: TypedNodes,
    client_nodes: TypedNodes,
    monitor_nodes: TypedNodes,

    new_data: Notify,
    stopped: AtomicBool,
}

impl NodeEnvironment {
    pub fn new() -> Self {
        Self {
            mgmtd_nodes: TypedNodes::new(NodeRole::Management),
            meta_nodes: TypedNodes::new(NodeRole::Metadata),
            storage_nodes: TypedNodes::new(NodeRole::Storage),
            client_nodes: TypedNodes::new(NodeRole::Client),
            monitor_nodes: TypedNodes::new(NodeRole::Monitor),
            new_data: Notify::new(),
            stopped: AtomicBool::new(false),
        }
    }

    /// The live registry for one role.
    pub fn nodes(&self, role: NodeRole) -> &TypedNodes {
        match role {
            NodeRole::Management => &self.mgmtd_nodes,
            NodeRole::Metadata => &self.meta_nodes,
            NodeRole::Storage => &self.storage_nodes,
            NodeRole::Client => &self.client_nodes,
            NodeRole::Monitor => &self.monitor_nodes,
        }
    }

    /// Look one node up by role and numeric ID.
    pub fn node(&self, role: NodeRole, num_id: u32) -> Option<Node> {
        self.nodes(role).get_by_num_id(num_id)
    }

    /// Sync one role's live registry from a candidate registry, returning
    /// the number of newly added nodes.
    pub fn sync_role(&self, role: NodeRole, candidate: &TypedNodes) -> Result<usize> {
        self.nodes(role).sync_from(candidate)
    }

    /// Merge a registry into one role's live registry. Returns false when
    /// nothing new was found or the roles do not match.
    pub fn merge_role(&self, role: NodeRole, new_nodes: &TypedNodes) -> bool {
        self.nodes(role).union(new_nodes)
    }

    /// Bulk-remove members from one role's live registry. Returns false
    /// when nothing matched.
    pub fn remove_role(&self, role: NodeRole, old_nodes: &TypedNodes) -> bool {
        self.nodes(role).remove_all(old_nodes)
    }

    /// Wake every consumer currently blocked in [`wait_new_data`]. Called
    /// by the poller only, after a cycle that actually changed a registry.
    ///
    /// [`wait_new_data`]: Self::wait_new_data
    pub fn signal_new_data(&self) {
        self.new_data.notify_waiters();
    }

    /// Park until the next "new data" signal. Returns immediately once the
    /// environment has been shut down, so blocked consumers can observe the
    /// stop and exit.
    pub async fn wait_new_data(&self) {
        let notified = self.new_data.notified();
        tokio::pin!(notified);

        // Register as a waiter before checking the stop flag, so a shutdown
        // signal between the check and the await cannot be missed.
        notified.as_mut().enable();

        if self.stopped.load(Ordering::SeqCst) {
            return;
        }

        notified.await;
    }

    /// Mark the environment stopped and wake all blocked consumers.
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.new_data.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Default for NodeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn storage_registry(nodes: &[(u32, &str)]) -> TypedNodes {
        let registry = TypedNodes::new(NodeRole::Storage);
        for (num_id, string_id) in nodes {
            registry.add(Node::with_default_group(
                *num_id,
                *string_id,
                NodeRole::Storage,
            ));
        }
        registry
    }

    #[test]
    fn test_role_dispatch() {
        let env = NodeEnvironment::new();

        for role in NodeRole::ALL {
            assert_eq!(env.nodes(role).role(), role);
            assert!(env.nodes(role).is_empty());
        }
    }

    #[test]
    fn test_sync_role_and_lookup() {
        let env = NodeEnvironment::new();
        let candidate = storage_registry(&[(1, "storA"), (2, "storB")]);

        assert_eq!(env.sync_role(NodeRole::Storage, &candidate).unwrap(), 2);
        assert_eq!(env.node(NodeRole::Storage, 1).unwrap().string_id(), "storA");
        assert!(env.node(NodeRole::Metadata, 1).is_none());
    }

    #[test]
    fn test_sync_role_rejects_mismatched_candidate() {
        let env = NodeEnvironment::new();
        let candidate = storage_registry(&[(1, "storA")]);

        assert!(env.sync_role(NodeRole::Metadata, &candidate).is_err());
        assert!(env.nodes(NodeRole::Metadata).is_empty());
    }

    #[test]
    fn test_merge_and_remove_role() {
        let env = NodeEnvironment::new();
        let incoming = storage_registry(&[(1, "storA")]);

        assert!(env.merge_role(NodeRole::Storage, &incoming));
        assert!(!env.merge_role(NodeRole::Storage, &incoming));

        assert!(env.remove_role(NodeRole::Storage, &incoming));
        assert!(env.nodes(NodeRole::Storage).is_empty());
        assert!(!env.remove_role(NodeRole::Storage, &incoming));
    }

    #[tokio::test]
    async fn test_signal_wakes_waiter() {
        let env = Arc::new(NodeEnvironment::new());

        let waiter = {
            let env = env.clone();
            tokio::spawn(async move { env.wait_new_data().await })
        };

        // let the waiter park before signaling
        tokio::time::sleep(Duration::from_millis(50)).await;
        env.signal_new_data();

        timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter should wake on signal")
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_signal_keeps_waiter_parked() {
        let env = Arc::new(NodeEnvironment::new());

        let env2 = env.clone();
        let parked = timeout(Duration::from_millis(100), async move {
            env2.wait_new_data().await
        })
        .await;

        assert!(parked.is_err(), "waiter must stay parked without a signal");
    }

    #[tokio::test]
    async fn test_shutdown_wakes_waiter() {
        let env = Arc::new(NodeEnvironment::new());

        let waiter = {
            let env = env.clone();
            tokio::spawn(async move { env.wait_new_data().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        env.shutdown();

        timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter should wake on shutdown")
            .unwrap();
        assert!(env.is_stopped());
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_returns_immediately() {
        let env = NodeEnvironment::new();
        env.shutdown();

        timeout(Duration::from_millis(100), env.wait_new_data())
            .await
            .expect("stopped environment must not block waiters");
    }
}
