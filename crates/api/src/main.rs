//! OrderSync - multi-channel marketplace order synchronization
//!
//! # Usage
//!
//! ```text
//! ordersync                      # run schedulers until Ctrl-C
//! ordersync --once               # run a single pass and exit
//! ordersync --config path.toml   # load configuration from a file
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ordersync_infra::config;
use ordersync_lib::utils::logging::init_tracing;
use ordersync_lib::AppContext;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ordersync", version, about = "Sync marketplace orders across channels")]
struct Cli {
    /// Run one sync pass, print the report and exit.
    #[arg(long)]
    once: bool,

    /// Config file to load instead of the environment and probed paths.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();

    let config = match cli.config {
        Some(path) => {
            let config = config::load_from_file(Some(path))?;
            config.validate()?;
            config
        }
        None => config::load()?,
    };

    init_tracing(&config.logging)?;
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, "no .env file loaded"),
    }

    let ctx = Arc::new(AppContext::new(config).await.context("failed to build app context")?);

    if cli.once {
        let report = ordersync_lib::sync_orders_now(&ctx).await.map_err(anyhow::Error::msg)?;
        let report_json = serde_json::to_string(&report)?;
        info!(report = %report_json, "order sync pass finished");
        ctx.shutdown().await?;
        return Ok(());
    }

    ctx.start().await.context("failed to start schedulers")?;
    info!("ordersync running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;

    info!("shutdown requested");
    ctx.shutdown().await?;
    Ok(())
}
