//! Background node-list synchronization loop

use crate::config::MonitorConfig;
use crate::environment::NodeEnvironment;
use crate::error::{NodesError, Result};
use crate::source::NodeListSource;
use crate::typed::TypedNodes;
use fsmon_types::{Node, NodeRole, RawNode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Drives the fetch -> parse -> merge cycle on a fixed interval.
///
/// The poller is the only writer of the environment's registries. A cycle
/// that adds at least one node rings the environment's doorbell exactly
/// once; a cycle that found nothing new stays silent, so consumers never
/// wake for nothing.
pub struct NodePoller {
    env: Arc<NodeEnvironment>,
    source: Arc<dyn NodeListSource>,
    config: MonitorConfig,
    stop: Arc<AtomicBool>,
    stop_notify: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl NodePoller {
    pub fn new(
        env: Arc<NodeEnvironment>,
        source: Arc<dyn NodeListSource>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            env,
            source,
            config,
            stop: Arc::new(AtomicBool::new(false)),
            stop_notify: Arc::new(Notify::new()),
            handle: None,
        }
    }

    pub fn environment(&self) -> Arc<NodeEnvironment> {
        self.env.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the poll loop. The first cycle runs immediately, later ones
    /// on the configured interval.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            tracing::debug!("node-list poller already running");
            return;
        }

        tracing::info!(
            endpoint = %self.config.endpoint,
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "starting node-list poller"
        );

        let env = self.env.clone();
        let source = self.source.clone();
        let stop = self.stop.clone();
        let stop_notify = self.stop_notify.clone();
        let interval = self.config.poll_interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stop_notify.notified() => break,
                }

                if stop.load(Ordering::SeqCst) {
                    break;
                }

                match run_cycle(&env, source.as_ref()).await {
                    Ok(0) => {
                        tracing::trace!("node list unchanged");
                    }
                    Ok(added) => {
                        tracing::debug!(added, "node registries grew, waking consumers");
                        env.signal_new_data();
                    }
                    Err(err) if err.is_transient() => {
                        tracing::warn!(error = %err, "node-list update skipped");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "node-list merge failed, retrying next cycle");
                    }
                }
            }

            // wake blocked consumers so they can observe the stop
            env.shutdown();
            tracing::info!("node-list poller stopped");
        }));
    }

    /// Cooperatively stop the poll loop and wait for it to finish. Blocked
    /// consumers are woken via the environment's shutdown signal.
    pub async fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so the loop also sees the stop when it
        // is mid-cycle rather than parked in select
        self.stop_notify.notify_one();

        match self.handle.take() {
            Some(handle) => {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "node-list poller task failed to join");
                }
            }
            None => self.env.shutdown(),
        }
    }
}

/// One fetch -> parse -> merge cycle. Returns the total number of nodes
/// newly added across all roles.
async fn run_cycle(env: &NodeEnvironment, source: &dyn NodeListSource) -> Result<usize> {
    let list = source.fetch_node_list().await?;

    let mut total_added = 0;
    for role in NodeRole::ALL {
        let candidate = match build_candidate(role, list.records(role)) {
            Ok(candidate) => candidate,
            Err(err) => {
                // only this role's candidate is dropped for the cycle
                tracing::warn!(role = %role, error = %err, "skipping role with malformed records");
                continue;
            }
        };

        total_added += env.sync_role(role, &candidate)?;
    }

    Ok(total_added)
}

/// Build one role's candidate registry out of its raw records. Any
/// unparsable record fails the whole candidate.
fn build_candidate(role: NodeRole, records: &[RawNode]) -> Result<TypedNodes> {
    let candidate = TypedNodes::new(role);

    for record in records {
        let num_id: u32 = record.node_num_id.parse().map_err(|_| {
            NodesError::format_error(
                role,
                format!(
                    "invalid numeric ID {:?} for node {:?}",
                    record.node_num_id, record.value
                ),
            )
        })?;

        let node = Node::new(num_id, record.value.clone(), record.group.clone(), role);
        if !candidate.add(node) {
            return Err(NodesError::registry(format!(
                "candidate insert rejected for {} node {:?}",
                role, record.value
            )));
        }
    }

    Ok(candidate)
}
