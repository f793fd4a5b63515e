mod app;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use sceneview_common::ViewerConfig;
use sceneview_tools::{ConsoleLayer, MessageLog};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "sceneview", about = "Interactive 3D scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML file overriding the default viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset root directory (overrides the config)
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log = MessageLog::new();
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer())
        .with(ConsoleLayer::new(log.clone()))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(root) = cli.assets {
        config.assets.root = root;
    }

    tracing::info!("sceneview starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(config, log);
    event_loop.run_app(&mut app)?;

    match app.into_error() {
        Some(err) => {
            tracing::error!("sceneview stopped: {err:#}");
            Err(err)
        }
        None => {
            tracing::info!("sceneview exited");
            Ok(())
        }
    }
}
