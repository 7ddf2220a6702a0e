use std::path::PathBuf;

use clap::Parser;
use demo_server::ServerConfig;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "demo-server")]
#[command(about = "Demo REST endpoints for HTTP client walkthroughs", long_about = None)]
struct Args {
    /// Optional TOML config file.
    #[arg(short, long, env = "DEMO_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Port override; the host of `bind_address` is kept.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Base directory for downloads.
    #[arg(long, env = "FILE_PATH")]
    file_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(file_path) = args.file_path {
        config.file_path = file_path;
    }

    tracing::info!(
        bind_address = %config.bind_address,
        file_path = %config.file_path.display(),
        "configuration loaded"
    );

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");
    demo_server::run(listener, config).await?;
    Ok(())
}
