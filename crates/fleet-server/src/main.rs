//! `fleet-server` — the planner's HTTP/WebSocket front door.
//!
//! Everything interesting happens in `fleet-service`; this binary loads a
//! road map, spawns the allocator, and exposes the wire protocol.

mod routes;
mod ws;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleet_core::{PlannerConfig, SystemClock};
use fleet_map::{demo_map, load_map};
use fleet_service::{run_allocator, FleetService};

#[derive(Parser, Debug)]
#[command(author, version, about = "Central fleet planner for line-following ground robots")]
struct Args {
    /// TCP listener for robots, operators, and observers
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// JSON road-map file; the built-in facility map is used when omitted
    #[arg(long)]
    graph: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let map = match &args.graph {
        Some(path) => {
            load_map(path).with_context(|| format!("loading road map {}", path.display()))?
        }
        None => demo_map(),
    };
    tracing::info!(
        cells = map.cell_count(),
        parking = map.parking_cells().count(),
        "road map ready"
    );

    let service = Arc::new(FleetService::new(
        Arc::new(map),
        PlannerConfig::default(),
        Arc::new(SystemClock),
    ));
    tokio::spawn(run_allocator(service.clone()));

    let app = routes::router(service);
    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    tracing::info!(listen = %args.listen, "fleet planner up");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
