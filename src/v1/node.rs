//! Nodes
//!
//! A node is one bare metal machine managed by the service. Nodes are
//! addressed by their `uuid`; ports hang off a node and power is driven
//! through the node's `state/power` resource.

use super::base::{collection_path, deserialize_timestamp, nested_path, resource_path, Manager};
use super::patch::Patch;
use super::port::Port;
use crate::client::error::Result;
use crate::client::transport::Transport;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

const COLLECTION: &str = "nodes";

/// A node record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub chassis_id: Option<u64>,
    pub driver: String,
    #[serde(default)]
    pub driver_info: Map<String, Value>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_power_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_provision_state: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable fields for a new node. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis_id: Option<u64>,
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_info: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

impl NodeCreate {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Default::default()
        }
    }
}

/// Current and target power state of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Power transitions the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerAction {
    On,
    Off,
    Reboot,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::On => "on",
            PowerAction::Off => "off",
            PowerAction::Reboot => "reboot",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a power transition request: `"on"` becomes `"power on"`
pub fn power_target(state: &str) -> Value {
    json!({ "target": format!("power {}", state) })
}

/// Manager for `/v1/nodes`
#[derive(Clone)]
pub struct NodeManager {
    base: Manager,
}

impl NodeManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            base: Manager::new(transport),
        }
    }

    pub async fn list(&self) -> Result<Vec<Node>> {
        self.base.list(&collection_path(COLLECTION), COLLECTION).await
    }

    pub async fn get(&self, node_id: &str) -> Result<Node> {
        self.base.get(&resource_path(COLLECTION, node_id)?).await
    }

    pub async fn create(&self, fields: &NodeCreate) -> Result<Node> {
        let node: Node = self.base.create(&collection_path(COLLECTION), fields).await?;
        tracing::info!("Created node with driver {}", node.driver);
        Ok(node)
    }

    pub async fn delete(&self, node_id: &str) -> Result<()> {
        self.base.delete(&resource_path(COLLECTION, node_id)?).await?;
        tracing::info!("Deleted node {}", node_id);
        Ok(())
    }

    pub async fn update(&self, node_id: &str, patch: &Patch) -> Result<Node> {
        self.base
            .update(&resource_path(COLLECTION, node_id)?, patch)
            .await
    }

    pub async fn list_ports(&self, node_id: &str) -> Result<Vec<Port>> {
        self.base
            .list(&nested_path(COLLECTION, node_id, "ports")?, "ports")
            .await
    }

    pub async fn get_power_state(&self, node_id: &str) -> Result<PowerState> {
        self.base
            .get(&nested_path(COLLECTION, node_id, "state/power")?)
            .await
    }

    /// Request a power transition. `state` is passed through unchecked, so
    /// callers that want validation should go through [`PowerAction`].
    ///
    /// The transition happens asynchronously on the service; the returned
    /// record reflects the accepted request, not the final state.
    pub async fn set_power_state(&self, node_id: &str, state: &str) -> Result<PowerState> {
        let power_state: PowerState = self
            .base
            .put(
                &nested_path(COLLECTION, node_id, "state/power")?,
                &power_target(state),
            )
            .await?;
        tracing::info!(
            "Requested power {} for node {} (target: {:?})",
            state,
            node_id,
            power_state.target
        );
        Ok(power_state)
    }

    pub async fn set_power_action(&self, node_id: &str, action: PowerAction) -> Result<PowerState> {
        self.set_power_state(node_id, action.as_str()).await
    }
}
