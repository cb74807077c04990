//! Raw node records as delivered by the management endpoint

use crate::node::{NodeRole, DEFAULT_GROUP};
use serde::{Deserialize, Serialize};

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

/// One unparsed node entry from the node-list response.
///
/// The numeric ID stays a string here; turning it into a number is the
/// engine's job, so a bad entry can fail one role without poisoning the
/// transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    /// Group label, defaulting when the endpoint omits it.
    #[serde(default = "default_group")]
    pub group: String,

    /// The node's string ID.
    pub value: String,

    /// Decimal numeric ID, still unparsed.
    #[serde(rename = "nodeNumID")]
    pub node_num_id: String,
}

impl RawNode {
    pub fn new(
        group: impl Into<String>,
        value: impl Into<String>,
        node_num_id: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            value: value.into(),
            node_num_id: node_num_id.into(),
        }
    }
}

/// Per-role node records for one poll cycle, in endpoint order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub mgmtd: Vec<RawNode>,

    #[serde(default)]
    pub meta: Vec<RawNode>,

    #[serde(default)]
    pub storage: Vec<RawNode>,

    #[serde(default)]
    pub client: Vec<RawNode>,

    #[serde(default)]
    pub admon: Vec<RawNode>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for one role.
    pub fn records(&self, role: NodeRole) -> &[RawNode] {
        match role {
            NodeRole::Management => &self.mgmtd,
            NodeRole::Metadata => &self.meta,
            NodeRole::Storage => &self.storage,
            NodeRole::Client => &self.client,
            NodeRole::Monitor => &self.admon,
        }
    }

    /// Replace the records of one role.
    pub fn set_records(&mut self, role: NodeRole, records: Vec<RawNode>) {
        match role {
            NodeRole::Management => self.mgmtd = records,
            NodeRole::Metadata => self.meta = records,
            NodeRole::Storage => self.storage = records,
            NodeRole::Client => self.client = records,
            NodeRole::Monitor => self.admon = records,
        }
    }

    /// Total record count across all roles.
    pub fn len(&self) -> usize {
        NodeRole::ALL
            .iter()
            .map(|role| self.records(*role).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
