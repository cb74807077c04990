//! Common types shared across fsmon crates
//!
//! This crate provides the leaf data model of the cluster monitoring
//! client: node identity records and the raw per-role records handed
//! over by the management endpoint.

pub mod node;
pub mod record;

pub use node::{Node, NodeRole, DEFAULT_GROUP};
pub use record::{NodeList, RawNode};
