use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inkpost::config::BlogConfig;
use inkpost::routes::{router, AppState};

#[derive(Parser, Debug)]
#[command(version, about = "Serve the blog and its JSON API")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = inkpost::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {:?}", e);
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = BlogConfig::from_file(&args.config)?;
    let bind_address = config.bind_address.clone();

    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!("inkpost {} listening on {}", env!("CARGO_PKG_VERSION"), bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
