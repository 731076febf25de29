use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use posture_coach::{server, Config, PostureSession};

#[derive(Parser, Debug)]
#[command(name = "posture-coach", about = "Posture analysis server for pose landmarks")]
#[command(version)]
struct Args {
    /// TOML config file; built-in defaults are used when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `server.bind`
    #[arg(long)]
    bind: Option<String>,

    /// Write the effective config to PATH and exit
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    if let Some(path) = &args.dump_config {
        config.save(path)?;
        info!(path = %path.display(), "config written");
        return Ok(());
    }

    info!(
        window = config.analysis.point_window,
        forward_tilt_deg = config.thresholds.forward_tilt_deg,
        "posture coach starting"
    );

    let session = PostureSession::new(&config);
    server::serve(&config.server, session).await
}
