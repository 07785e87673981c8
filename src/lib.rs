//! Client for the Ironic bare metal v1 REST API
//!
//! - [`client`] - Transports (HTTP and a recording fake) and errors
//! - [`v1`] - Node, port and chassis managers
//! - [`config`] - Persistent client configuration

pub mod client;
pub mod config;
pub mod v1;

pub use client::error::{Error, Result};
