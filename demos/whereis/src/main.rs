//! Command-line client for a Waypoint registry.
//!
//! ```text
//! whereis --registry registry1 find orders-service
//! whereis --registry registry1 invalidate orders-service
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use waypoint::prelude::*;
use waypoint::{INVALIDATION_PORT, RESOLUTION_PORT};

#[derive(Debug, Parser)]
#[command(name = "whereis", version, about = "Look up and invalidate services in a registry")]
struct Cli {
    /// Registry host to query.
    #[arg(long, env = "WAYPOINT_REGISTRY", default_value = "localhost")]
    registry: String,

    /// Port of the registry's resolution endpoint.
    #[arg(long, env = "WAYPOINT_RESOLUTION_PORT", default_value_t = RESOLUTION_PORT)]
    resolution_port: u16,

    /// Port of the registry's invalidation endpoint.
    #[arg(long, env = "WAYPOINT_INVALIDATION_PORT", default_value_t = INVALIDATION_PORT)]
    invalidation_port: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one or more services and print their records.
    Find {
        /// Service names.
        #[arg(required = true)]
        services: Vec<String>,

        /// Pretty-print records.
        #[arg(long)]
        pretty: bool,
    },

    /// Ask the registry to drop a service.
    Invalidate {
        /// Service name.
        service: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::new()
        .resolution_port(cli.resolution_port)
        .invalidation_port(cli.invalidation_port);
    let client = RegistryClient::with_config(ZmqTransport::new(), config);

    match cli.command {
        Command::Find { services, pretty } => {
            for service in services {
                let record = client
                    .whereis(&service, &cli.registry)
                    .await
                    .inspect_err(|error| {
                        tracing::error!(service = %service, host = error.host(), "lookup failed");
                    })
                    .with_context(|| format!("failed to resolve {service}"))?;

                let rendered = if pretty {
                    serde_json::to_string_pretty(record.as_value())?
                } else {
                    record.to_string()
                };
                println!("{service}\t{rendered}");
            }
        }
        Command::Invalidate { service } => {
            client.invalidate(&service, &cli.registry).await;
            tracing::info!(service = %service, registry = %cli.registry, "invalidation sent");
        }
    }

    Ok(())
}
