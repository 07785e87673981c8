//! Ironic v1 API
//!
//! Resource managers for the v1 REST API. Each manager method maps to exactly
//! one request: a fixed verb and URL template, plus a JSON body for writes.
//!
//! # Module Structure
//!
//! - [`node`] - Nodes, their ports and power state
//! - [`port`] - Ports
//! - [`chassis`] - Chassis and the nodes they contain
//! - [`patch`] - Patch documents for updates
//!
//! # Example
//!
//! ```ignore
//! use ironic_client::v1::Client;
//!
//! async fn example(client: &Client) -> ironic_client::Result<()> {
//!     for node in client.node().list().await? {
//!         println!("{:?} {}", node.uuid, node.driver);
//!     }
//!     Ok(())
//! }
//! ```

mod base;
pub mod chassis;
pub mod node;
pub mod patch;
pub mod port;

pub use base::{collection_path, nested_path, resource_path, API_PREFIX};
pub use chassis::{Chassis, ChassisCreate, ChassisManager};
pub use node::{Node, NodeCreate, NodeManager, PowerAction, PowerState};
pub use patch::{Patch, PatchOp};
pub use port::{Port, PortCreate, PortManager};

use crate::client::error::Result;
use crate::client::http::HttpTransport;
use crate::client::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

/// Entry point bundling one transport and the managers built on it
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client over HTTP for `endpoint`, authenticating with `token` if given
    pub fn connect(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let transport = HttpTransport::new(endpoint, token, timeout)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn node(&self) -> NodeManager {
        NodeManager::new(Arc::clone(&self.transport))
    }

    pub fn port(&self) -> PortManager {
        PortManager::new(Arc::clone(&self.transport))
    }

    pub fn chassis(&self) -> ChassisManager {
        ChassisManager::new(Arc::clone(&self.transport))
    }
}
