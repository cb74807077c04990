//! Monitoring client configuration

use crate::error::{NodesError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the node-list poller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Node-list endpoint of the management daemon
    pub endpoint: String,

    /// Whether client mounts are requested from the endpoint
    pub include_clients: bool,

    /// Whether monitoring daemons are requested from the endpoint
    pub include_monitors: bool,

    /// How often the node list is polled
    pub poll_interval: Duration,

    /// Timeout for one node-list request
    pub request_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/XML_NodeList".to_string(),
            include_clients: true,
            include_monitors: true,
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodesError::configuration(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| NodesError::configuration(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NodesError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| NodesError::configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(NodesError::configuration("Endpoint cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(NodesError::configuration(
                "Endpoint must be an http(s) URL",
            ));
        }

        if self.poll_interval < Duration::from_millis(100) {
            return Err(NodesError::configuration(
                "Poll interval must be at least 100ms",
            ));
        }

        if self.request_timeout < Duration::from_millis(100) {
            return Err(NodesError::configuration(
                "Request timeout must be at least 100ms",
            ));
        }

        Ok(())
    }
}
