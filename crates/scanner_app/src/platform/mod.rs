mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod ui;

use clap::Parser;
use scanner_logging::{scanner_error, scanner_info};

use cli::Cli;

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level);
    scanner_info!("media-scanner {} starting", env!("CARGO_PKG_VERSION"));

    let mut settings = config::load_settings(&cli.config);
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if cli.write_config {
        config::save_settings(&cli.config, &settings)?;
        scanner_info!("Wrote settings to {:?}", cli.config);
    }

    app::run(&settings).inspect_err(|err| scanner_error!("Session aborted: {:#}", err))
}
