mod shell;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ironic_client::client::format_error;
use ironic_client::config::Config;
use ironic_client::v1::Client;
use shell::Command;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line client for the Ironic bare metal API
#[derive(Parser, Debug)]
#[command(name = "ironic", version, about, long_about = None)]
struct Args {
    /// Ironic API endpoint
    #[arg(long, env = "IRONIC_URL")]
    ironic_url: Option<String>,

    /// Pre-issued auth token
    #[arg(long, env = "OS_AUTH_TOKEN", hide_env_values = true)]
    os_auth_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Store the endpoint and timeout in the config file for later runs
    #[arg(long)]
    save_config: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ironic started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ironic-client").join("ironic.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ironic-client").join("ironic.log");
    }
    PathBuf::from("ironic.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            match err.downcast_ref::<ironic_client::Error>() {
                Some(client_err) => eprintln!("Error: {} ({err:#})", format_error(client_err)),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();
    let endpoint = config.effective_endpoint(args.ironic_url.as_deref());
    let token = config.effective_token(args.os_auth_token.as_deref());
    let timeout = config.effective_timeout(args.timeout);

    tracing::info!("Using endpoint: {}", endpoint);

    if args.save_config {
        config.remember(&endpoint, timeout);
        config.save().context("Failed to save config")?;
        tracing::info!("Saved config to {:?}", Config::config_path());
    }

    let client = Client::connect(&endpoint, token, timeout)
        .with_context(|| format!("Failed to create client for {}", endpoint))?;

    shell::run(args.command, &client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironic_client::v1::{PatchOp, PowerAction};
    use serde_json::Value;

    const NODE_UUID: &str = "66666666-7777-8888-9999-000000000000";

    #[test]
    fn test_unknown_power_state_is_rejected() {
        let result =
            Args::try_parse_from(["ironic", "node-set-power-state", NODE_UUID, "sideways"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_power_state_parses() {
        let args = Args::try_parse_from(["ironic", "node-set-power-state", NODE_UUID, "reboot"])
            .unwrap();
        assert!(matches!(
            args.command,
            Command::NodeSetPowerState { power_state: PowerAction::Reboot, .. }
        ));
    }

    #[test]
    fn test_node_update_parses_patch_op() {
        let args =
            Args::try_parse_from(["ironic", "node-update", NODE_UUID, "replace", "driver=x"])
                .unwrap();
        match args.command {
            Command::NodeUpdate { node, op, attribute } => {
                assert_eq!(node, NODE_UUID);
                assert_eq!(op, PatchOp::Replace);
                assert_eq!(attribute, "driver=x");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_node_create_collects_driver_info() {
        let args = Args::try_parse_from([
            "ironic",
            "node-create",
            "--driver",
            "fake",
            "--driver-info",
            "user=foo",
            "--driver-info",
            "password=bar",
        ])
        .unwrap();
        match args.command {
            Command::NodeCreate { driver, driver_info, .. } => {
                assert_eq!(driver, "fake");
                assert_eq!(
                    driver_info,
                    vec![
                        ("user".to_string(), Value::String("foo".to_string())),
                        ("password".to_string(), Value::String("bar".to_string())),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_key_value_is_rejected() {
        let result =
            Args::try_parse_from(["ironic", "node-create", "--driver", "fake", "-i", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_parse() {
        let args = Args::try_parse_from([
            "ironic",
            "--ironic-url",
            "http://ironic.example:6385",
            "--timeout",
            "5",
            "--save-config",
            "node-list",
        ])
        .unwrap();
        assert_eq!(args.ironic_url.as_deref(), Some("http://ironic.example:6385"));
        assert_eq!(args.timeout, Some(5));
        assert!(args.save_config);
        assert!(matches!(args.command, Command::NodeList));
    }
}
