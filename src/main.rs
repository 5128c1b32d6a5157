//! UK Tax Calculation Engine API server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use uk_tax_engine::api::{AppState, create_router};
use uk_tax_engine::config::ConfigLoader;

/// UK tax calculation REST API server
#[derive(Parser, Debug)]
#[command(name = "uk-tax-engine")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory of tax-year YAML files (defaults to the built-in dataset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(dir) => ConfigLoader::load(dir)?,
        None => ConfigLoader::builtin()?.clone(),
    };
    info!(
        tax_years = config.table().len(),
        latest = ?config.latest_tax_year(),
        "Tax-year constants loaded"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(address = %args.bind, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
