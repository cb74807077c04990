//! Fetch/parse boundary to the management endpoint

use crate::config::MonitorConfig;
use crate::error::{NodesError, Result};
use async_trait::async_trait;
use fsmon_types::{NodeList, NodeRole, RawNode};

/// Supplies the raw per-role node records for one poll cycle.
///
/// Transport problems surface as [`NodesError::Communication`]; a role
/// section that fails to decode is reported empty for the cycle so the
/// other roles still proceed.
#[async_trait]
pub trait NodeListSource: Send + Sync {
    async fn fetch_node_list(&self) -> Result<NodeList>;
}

/// Fetches the node list from the management daemon over HTTP.
pub struct HttpNodeListSource {
    client: reqwest::Client,
    endpoint: String,
    include_clients: bool,
    include_monitors: bool,
}

impl HttpNodeListSource {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                NodesError::communication(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            include_clients: config.include_clients,
            include_monitors: config.include_monitors,
        })
    }
}

#[async_trait]
impl NodeListSource for HttpNodeListSource {
    async fn fetch_node_list(&self) -> Result<NodeList> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("clients", self.include_clients),
                ("admon", self.include_monitors),
            ])
            .send()
            .await
            .map_err(|e| NodesError::communication(format!("Node-list request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| {
                NodesError::communication(format!("Node-list request rejected: {}", e))
            })?;

        let body: serde_json::Value = response.json().await.map_err(|e| {
            NodesError::communication(format!("Invalid node-list response body: {}", e))
        })?;

        Ok(decode_sections(&body))
    }
}

/// Decode the per-role sections of a node-list document. A section that
/// fails to decode leaves that role empty for the cycle; the rest still
/// come through.
fn decode_sections(body: &serde_json::Value) -> NodeList {
    let mut list = NodeList::new();

    for role in NodeRole::ALL {
        let Some(section) = body.get(role.key()) else {
            continue;
        };

        match serde_json::from_value::<Vec<RawNode>>(section.clone()) {
            Ok(records) => list.set_records(role, records),
            Err(e) => {
                tracing::warn!(
                    role = %role,
                    error = %e,
                    "malformed node-list section, treating role as empty this cycle"
                );
            }
        }
    }

    list
}
