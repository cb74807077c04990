//! Engine error types

use fsmon_types::NodeRole;

/// Result type for node-environment operations
pub type Result<T> = std::result::Result<T, NodesError>;

/// Errors raised by the node-environment synchronization engine
#[derive(Debug, thiserror::Error)]
pub enum NodesError {
    /// The management endpoint could not be reached or answered badly.
    /// Recoverable: the affected poll cycle is skipped.
    #[error("Communication error: {0}")]
    Communication(String),

    /// A node record for one role could not be parsed. Recoverable per
    /// role: the role's candidate set is dropped for the cycle.
    #[error("Malformed {role} node record: {reason}")]
    Format { role: NodeRole, reason: String },

    /// A registry was handed input of the wrong role. Signals a
    /// data-model bug, not a network hiccup.
    #[error("Role mismatch: registry holds {expected} nodes, got {actual}")]
    RoleMismatch {
        expected: NodeRole,
        actual: NodeRole,
    },

    /// A registry insert hard-failed during a merge.
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NodesError {
    pub fn communication<T: Into<String>>(msg: T) -> Self {
        Self::Communication(msg.into())
    }

    pub fn format_error<T: Into<String>>(role: NodeRole, reason: T) -> Self {
        Self::Format {
            role,
            reason: reason.into(),
        }
    }

    pub fn role_mismatch(expected: NodeRole, actual: NodeRole) -> Self {
        Self::RoleMismatch { expected, actual }
    }

    pub fn registry<T: Into<String>>(msg: T) -> Self {
        Self::Registry(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for errors that only skip a cycle rather than indicating a bug.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Communication(_) | Self::Format { .. })
    }
}

impl From<reqwest::Error> for NodesError {
    fn from(err: reqwest::Error) -> Self {
        Self::communication(format!("HTTP client error: {}", err))
    }
}
