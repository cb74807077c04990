//! Node-environment synchronization engine
//!
//! This crate keeps a consistent, thread-safe view of the membership of a
//! distributed filesystem cluster. A background poller fetches the node
//! list from the management daemon on a fixed interval, merges it into one
//! typed registry per role, and rings a payload-free doorbell whenever a
//! cycle actually changed something. Consumers wait on the doorbell and
//! re-read the registries; the view is best-effort and may trail the
//! cluster by up to one interval.

pub mod config;
pub mod environment;
pub mod error;
pub mod poller;
pub mod registry;
pub mod source;
pub mod typed;

pub use config::MonitorConfig;
pub use environment::NodeEnvironment;
pub use error::{NodesError, Result};
pub use poller::NodePoller;
pub use registry::Nodes;
pub use source::{HttpNodeListSource, NodeListSource};
pub use typed::TypedNodes;

pub use fsmon_types::{Node, NodeList, NodeRole, RawNode, DEFAULT_GROUP};
