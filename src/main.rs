use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rootserve::config::{Config, ServeMode};
use rootserve::{AppState, routes};

#[derive(Parser, Debug)]
#[command(name = "rootserve")]
#[command(about = "Minimal file server for a single root directory")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Address to bind to (defaults to 0.0.0.0 in catalog mode, 127.0.0.1 in minimal mode)
    #[arg(short, long)]
    bind: Option<String>,

    /// Root directory to serve files from
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Route table to expose (overrides the config file)
    #[arg(short, long, value_enum)]
    mode: Option<ServeMode>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "rootserve=debug,tower_http=debug"
    } else {
        "rootserve=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    if !cli.root.exists() {
        return Err(format!("Root directory does not exist: {}", cli.root.display()).into());
    }

    if !cli.root.is_dir() {
        return Err(format!("Root path is not a directory: {}", cli.root.display()).into());
    }

    let bind = cli
        .bind
        .clone()
        .unwrap_or_else(|| config.mode.default_bind().to_string());

    let state = AppState::with_config(&cli.root, config)?;

    info!("Serving files from: {}", state.root_dir.display());
    info!("Mode: {:?}", state.config.mode);

    let app = routes::build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", bind, cli.port).parse()?;
    info!("Starting rootserve on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
