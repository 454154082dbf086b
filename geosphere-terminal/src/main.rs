/// Geosphere Terminal Demo - Rippling Icosphere
///
/// Renders the software-rasterized sphere into the terminal.
/// Controls:
///   - Mouse wheel / +-: Zoom
///   - Arrow Keys / A D: Spin direction
///   - Drag the sphere: Move it around the terminal
///   - Q/ESC: Quit

mod cli;

use geosphere_core::{config, RenderError, SphereConfig};
use geosphere_terminal::TerminalApp;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "geosphere=warn";

fn init_logging(args: &cli::Args) -> Result<(), RenderError> {
    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    // The terminal is owned by the renderer, so logs prefer a file
    match &args.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_config(args: &cli::Args) -> SphereConfig {
    let mut config = match &args.config {
        Some(path) => config::load_from_path(path).unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {e}");
            SphereConfig::default()
        }),
        None => SphereConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.window.fps = fps;
    }
    config
}

fn main() -> Result<(), RenderError> {
    let args = cli::parse();
    init_logging(&args)?;

    tracing::info!("geosphere v{} starting", env!("CARGO_PKG_VERSION"));
    let config = load_config(&args);

    let mut app = TerminalApp::new(&config)?;
    let result = app.run();
    if let Err(e) = &result {
        tracing::error!("renderer stopped: {e}");
    }
    tracing::info!("shutdown complete");
    result
}
