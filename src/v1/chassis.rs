//! Chassis
//!
//! A chassis groups nodes; nodes point at it through `chassis_id`.

use super::base::{collection_path, deserialize_timestamp, nested_path, resource_path, Manager};
use super::node::Node;
use super::patch::Patch;
use crate::client::error::Result;
use crate::client::transport::Transport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

// "chassis" is both the collection name and the list key
const COLLECTION: &str = "chassis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chassis {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
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
pub struct ChassisCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// Manager for `/v1/chassis`
#[derive(Clone)]
pub struct ChassisManager {
    base: Manager,
}

impl ChassisManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            base: Manager::new(transport),
        }
    }

    pub async fn list(&self) -> Result<Vec<Chassis>> {
        self.base.list(&collection_path(COLLECTION), COLLECTION).await
    }

    pub async fn get(&self, chassis_id: &str) -> Result<Chassis> {
        self.base.get(&resource_path(COLLECTION, chassis_id)?).await
    }

    pub async fn create(&self, fields: &ChassisCreate) -> Result<Chassis> {
        self.base.create(&collection_path(COLLECTION), fields).await
    }

    pub async fn delete(&self, chassis_id: &str) -> Result<()> {
        self.base
            .delete(&resource_path(COLLECTION, chassis_id)?)
            .await?;
        tracing::info!("Deleted chassis {}", chassis_id);
        Ok(())
    }

    pub async fn update(&self, chassis_id: &str, patch: &Patch) -> Result<Chassis> {
        self.base
            .update(&resource_path(COLLECTION, chassis_id)?, patch)
            .await
    }

    /// Nodes that belong to this chassis
    pub async fn list_nodes(&self, chassis_id: &str) -> Result<Vec<Node>> {
        self.base
            .list(&nested_path(COLLECTION, chassis_id, "nodes")?, "nodes")
            .await
    }
}
