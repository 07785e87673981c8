//! Shell Commands
//!
//! Subcommands of the `ironic` binary and their execution against a client.

use anyhow::{Context, Result};
use clap::Subcommand;
use ironic_client::v1::{ChassisCreate, Client, NodeCreate, Patch, PatchOp, PortCreate, PowerAction};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List nodes
    NodeList,
    /// Show a node
    NodeShow {
        /// UUID of the node
        node: String,
    },
    /// Register a new node
    NodeCreate {
        /// Driver used to manage the node
        #[arg(short, long)]
        driver: String,
        /// Chassis the node belongs to
        #[arg(short, long)]
        chassis_id: Option<u64>,
        /// Driver credentials/config, key=value (repeatable)
        #[arg(short = 'i', long, value_parser = parse_key_value)]
        driver_info: Vec<(String, Value)>,
        /// Node properties, key=value (repeatable)
        #[arg(short, long, value_parser = parse_key_value)]
        properties: Vec<(String, Value)>,
        /// Free-form metadata, key=value (repeatable)
        #[arg(short, long, value_parser = parse_key_value)]
        extra: Vec<(String, Value)>,
    },
    /// Delete one or more nodes
    NodeDelete {
        #[arg(required = true)]
        nodes: Vec<String>,
    },
    /// Update a node with one patch operation
    NodeUpdate {
        node: String,
        /// add, replace or remove
        op: PatchOp,
        /// attribute[=value], e.g. driver_info/user=admin
        attribute: String,
    },
    /// List the ports of a node
    NodePortList { node: String },
    /// Power a node on, off, or reboot it
    NodeSetPowerState { node: String, power_state: PowerAction },
    /// Show the power state of a node
    NodeShowPowerState { node: String },

    /// List ports
    PortList,
    /// Show a port
    PortShow { port: String },
    /// Create a port
    PortCreate {
        /// MAC address of the port
        #[arg(short, long)]
        address: String,
        /// Internal id of the owning node
        #[arg(short, long)]
        node_id: Option<u64>,
        #[arg(short, long, value_parser = parse_key_value)]
        extra: Vec<(String, Value)>,
    },
    /// Delete one or more ports
    PortDelete {
        #[arg(required = true)]
        ports: Vec<String>,
    },
    /// Update a port with one patch operation
    PortUpdate {
        port: String,
        op: PatchOp,
        attribute: String,
    },

    /// List chassis
    ChassisList,
    /// Show a chassis
    ChassisShow { chassis: String },
    /// Create a chassis
    ChassisCreate {
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_parser = parse_key_value)]
        extra: Vec<(String, Value)>,
    },
    /// Delete one or more chassis
    ChassisDelete {
        #[arg(required = true)]
        chassis: Vec<String>,
    },
    /// Update a chassis with one patch operation
    ChassisUpdate {
        chassis: String,
        op: PatchOp,
        attribute: String,
    },
    /// List the nodes of a chassis
    ChassisNodeList { chassis: String },
}

impl Command {
    /// Subcommand name as typed on the command line. Arguments are left out
    /// since they may carry driver credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Command::NodeList => "node-list",
            Command::NodeShow { .. } => "node-show",
            Command::NodeCreate { .. } => "node-create",
            Command::NodeDelete { .. } => "node-delete",
            Command::NodeUpdate { .. } => "node-update",
            Command::NodePortList { .. } => "node-port-list",
            Command::NodeSetPowerState { .. } => "node-set-power-state",
            Command::NodeShowPowerState { .. } => "node-show-power-state",
            Command::PortList => "port-list",
            Command::PortShow { .. } => "port-show",
            Command::PortCreate { .. } => "port-create",
            Command::PortDelete { .. } => "port-delete",
            Command::PortUpdate { .. } => "port-update",
            Command::ChassisList => "chassis-list",
            Command::ChassisShow { .. } => "chassis-show",
            Command::ChassisCreate { .. } => "chassis-create",
            Command::ChassisDelete { .. } => "chassis-delete",
            Command::ChassisUpdate { .. } => "chassis-update",
            Command::ChassisNodeList { .. } => "chassis-node-list",
        }
    }
}

/// Parse a `key=value` argument
pub fn parse_key_value(arg: &str) -> std::result::Result<(String, Value), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), Value::String(value.to_string())))
        }
        _ => Err(format!("expected key=value, got '{}'", arg)),
    }
}

fn to_map(pairs: Vec<(String, Value)>) -> Option<Map<String, Value>> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to format output")?;
    println!("{}", out);
    Ok(())
}

/// Execute one command
pub async fn run(command: Command, client: &Client) -> Result<()> {
    tracing::debug!("Running {}", command.name());

    match command {
        Command::NodeList => print_json(&client.node().list().await?),
        Command::NodeShow { node } => print_json(&client.node().get(&node).await?),
        Command::NodeCreate {
            driver,
            chassis_id,
            driver_info,
            properties,
            extra,
        } => {
            let fields = NodeCreate {
                chassis_id,
                driver,
                driver_info: to_map(driver_info),
                properties: to_map(properties),
                extra: to_map(extra),
            };
            print_json(&client.node().create(&fields).await?)
        }
        Command::NodeDelete { nodes } => {
            let manager = client.node();
            for node in nodes {
                manager
                    .delete(&node)
                    .await
                    .with_context(|| format!("Failed to delete node {}", node))?;
                println!("Deleted node {}", node);
            }
            Ok(())
        }
        Command::NodeUpdate {
            node,
            op,
            attribute,
        } => {
            let patch = Patch::from_arg(op, &attribute)?;
            print_json(&client.node().update(&node, &patch).await?)
        }
        Command::NodePortList { node } => print_json(&client.node().list_ports(&node).await?),
        Command::NodeSetPowerState { node, power_state } => print_json(
            &client
                .node()
                .set_power_action(&node, power_state)
                .await?,
        ),
        Command::NodeShowPowerState { node } => {
            print_json(&client.node().get_power_state(&node).await?)
        }

        Command::PortList => print_json(&client.port().list().await?),
        Command::PortShow { port } => print_json(&client.port().get(&port).await?),
        Command::PortCreate {
            address,
            node_id,
            extra,
        } => {
            let fields = PortCreate {
                node_id,
                address,
                extra: to_map(extra),
            };
            print_json(&client.port().create(&fields).await?)
        }
        Command::PortDelete { ports } => {
            let manager = client.port();
            for port in ports {
                manager
                    .delete(&port)
                    .await
                    .with_context(|| format!("Failed to delete port {}", port))?;
                println!("Deleted port {}", port);
            }
            Ok(())
        }
        Command::PortUpdate {
            port,
            op,
            attribute,
        } => {
            let patch = Patch::from_arg(op, &attribute)?;
            print_json(&client.port().update(&port, &patch).await?)
        }

        Command::ChassisList => print_json(&client.chassis().list().await?),
        Command::ChassisShow { chassis } => print_json(&client.chassis().get(&chassis).await?),
        Command::ChassisCreate { description, extra } => {
            let fields = ChassisCreate {
                description,
                extra: to_map(extra),
            };
            print_json(&client.chassis().create(&fields).await?)
        }
        Command::ChassisDelete { chassis } => {
            let manager = client.chassis();
            for id in chassis {
                manager
                    .delete(&id)
                    .await
                    .with_context(|| format!("Failed to delete chassis {}", id))?;
                println!("Deleted chassis {}", id);
            }
            Ok(())
        }
        Command::ChassisUpdate {
            chassis,
            op,
            attribute,
        } => {
            let patch = Patch::from_arg(op, &attribute)?;
            print_json(&client.chassis().update(&chassis, &patch).await?)
        }
        Command::ChassisNodeList { chassis } => {
            print_json(&client.chassis().list_nodes(&chassis).await?)
        }
    }
}
