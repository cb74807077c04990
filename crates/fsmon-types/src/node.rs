//! Cluster node identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Group label assigned to nodes that carry no explicit group.
pub const DEFAULT_GROUP: &str = "Default";

/// Role of a member in the filesystem cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Management daemon - coordinates the cluster
    Management,

    /// Metadata server - owns the directory tree
    Metadata,

    /// Storage server - holds file contents
    Storage,

    /// Client mount - a host consuming the filesystem
    Client,

    /// Monitoring daemon
    Monitor,
}

impl NodeRole {
    /// All roles, in the order the management endpoint reports them.
    pub const ALL: [NodeRole; 5] = [
        NodeRole::Management,
        NodeRole::Metadata,
        NodeRole::Storage,
        NodeRole::Client,
        NodeRole::Monitor,
    ];

    /// The section key used for this role on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Management => "mgmtd",
            Self::Metadata => "meta",
            Self::Storage => "storage",
            Self::Client => "client",
            Self::Monitor => "admon",
        }
    }

    /// Resolve a wire section key back to a role.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "mgmtd" => Some(Self::Management),
            "meta" => Some(Self::Metadata),
            "storage" => Some(Self::Storage),
            "client" => Some(Self::Client),
            "admon" => Some(Self::Monitor),
            _ => None,
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Management => write!(f, "management"),
            Self::Metadata => write!(f, "metadata"),
            Self::Storage => write!(f, "storage"),
            Self::Client => write!(f, "client"),
            Self::Monitor => write!(f, "monitor"),
        }
    }
}

/// Identity record for one cluster member.
///
/// Equality and hashing cover `num_id`, `string_id` and `role` only. The
/// `group` label is a display-side partition: a node moved to another group
/// stays the same member, so group changes never alter registry membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    num_id: u32,
    string_id: String,
    group: String,
    role: NodeRole,
}

impl Node {
    /// Create a new node record.
    pub fn new(
        num_id: u32,
        string_id: impl Into<String>,
        group: impl Into<String>,
        role: NodeRole,
    ) -> Self {
        Self {
            num_id,
            string_id: string_id.into(),
            group: group.into(),
            role,
        }
    }

    /// Create a node in the default group.
    pub fn with_default_group(num_id: u32, string_id: impl Into<String>, role: NodeRole) -> Self {
        Self::new(num_id, string_id, DEFAULT_GROUP, role)
    }

    pub fn num_id(&self) -> u32 {
        self.num_id
    }

    pub fn string_id(&self) -> &str {
        &self.string_id
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Reassign the group label. Used only during controlled rebuilds;
    /// membership is unaffected.
    pub fn set_group(&mut self, group: impl Into<String>) {
        self.group = group.into();
    }

    /// Human-readable form: clients render as their string ID alone, every
    /// other role carries the numeric ID as a bracket suffix.
    pub fn display_name(&self) -> String {
        match self.role {
            NodeRole::Client => self.string_id.clone(),
            _ => format!("{} [ID: {}]", self.string_id, self.num_id),
        }
    }

    /// Recover `(string_id, num_id)` from a display name. A missing or
    /// unparsable bracket suffix yields the whole input and a numeric ID of 0.
    pub fn parse_display_name(name: &str) -> (String, u32) {
        if let Some(idx) = name.rfind(" [ID: ") {
            let suffix = &name[idx + " [ID: ".len()..];
            if let Some(digits) = suffix.strip_suffix(']') {
                if let Ok(num_id) = digits.parse::<u32>() {
                    return (name[..idx].to_string(), num_id);
                }
            }
        }

        (name.to_string(), 0)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.num_id == other.num_id
            && self.string_id == other.string_id
            && self.role == other.role
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num_id.hash(state);
        self.string_id.hash(state);
        self.role.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
