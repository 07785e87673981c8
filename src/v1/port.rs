//! Ports
//!
//! A port is a network interface of a node, keyed by its hardware address.

use super::base::{collection_path, deserialize_timestamp, resource_path, Manager};
use super::patch::Patch;
use crate::client::error::Result;
use crate::client::transport::Transport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

const COLLECTION: &str = "ports";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub node_id: Option<u64>,
    pub address: String,
    #[serde(default)]
    pub extra: Map<String, Value>,
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

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u64>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// Manager for `/v1/ports`
#[derive(Clone)]
pub struct PortManager {
    base: Manager,
}

impl PortManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            base: Manager::new(transport),
        }
    }

    pub async fn list(&self) -> Result<Vec<Port>> {
        self.base.list(&collection_path(COLLECTION), COLLECTION).await
    }

    pub async fn get(&self, port_id: &str) -> Result<Port> {
        self.base.get(&resource_path(COLLECTION, port_id)?).await
    }

    pub async fn create(&self, fields: &PortCreate) -> Result<Port> {
        let port: Port = self.base.create(&collection_path(COLLECTION), fields).await?;
        tracing::info!("Created port {}", port.address);
        Ok(port)
    }

    pub async fn delete(&self, port_id: &str) -> Result<()> {
        self.base.delete(&resource_path(COLLECTION, port_id)?).await?;
        tracing::info!("Deleted port {}", port_id);
        Ok(())
    }

    pub async fn update(&self, port_id: &str, patch: &Patch) -> Result<Port> {
        self.base
            .update(&resource_path(COLLECTION, port_id)?, patch)
            .await
    }
}
