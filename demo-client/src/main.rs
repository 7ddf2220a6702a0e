use std::path::PathBuf;

use clap::Parser;
use demo_client::{Walkthrough, WalkthroughOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rest-demo")]
#[command(about = "Call every demo-server endpoint and print the responses", long_about = None)]
struct Cli {
    #[arg(short, long, env = "REST_DEMO_URL", default_value = "http://localhost:8080")]
    url: String,

    /// File name to request from /rest/download.
    #[arg(short, long, default_value = "test.txt")]
    download: String,

    /// Upload this file instead of the built-in sample.
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Also stream the download into this file without buffering it.
    #[arg(long)]
    save_to: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut options = WalkthroughOptions {
        download: cli.download,
        save_to: cli.save_to,
        ..WalkthroughOptions::default()
    };
    if let Some(path) = &cli.upload {
        options = options.with_upload_path(path)?;
    }

    tracing::info!(url = %cli.url, "starting walkthrough");
    Walkthrough::new(&cli.url).run(&options)?;
    tracing::info!("walkthrough complete");
    Ok(())
}
