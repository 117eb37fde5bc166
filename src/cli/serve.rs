use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::cli::runtime::build_transport;
use crate::server::{build_router, ServeState};

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Address to listen on (defaults to `server.bind` from the config)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Replay model replies from a YAML script instead of calling the API
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let addr: SocketAddr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid server.bind address {}", config.server.bind))?,
    };

    let transport = build_transport(config, args.script.as_deref())?;
    let state = ServeState::new(transport);
    let app = build_router(state, &config.server.cors_origin);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "SitePilot chat endpoint listening");
    println!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
}
