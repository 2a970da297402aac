mod app;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fieldguide::GuideConfig;

use app::App;

#[derive(Parser)]
#[command(name = "fieldguide", about = "Wildlife survey dashboard with a guided tour", version)]
struct Cli {
    /// Path to a TOML config overriding the tooltip/timing defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Page to start on (overview, surveys, settings)
    #[arg(long, default_value = "overview")]
    page: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logging = fieldguide::logging::init_logging(Some(&cli.log_dir), cli.debug)?;
    if let Some(path) = &logging.log_file_path {
        info!(path = %path.display(), "logging to file");
    }

    let config = match &cli.config {
        Some(path) => GuideConfig::load(path)?,
        None => App::terminal_config(),
    };

    App::new(config, &cli.page).run()
}
