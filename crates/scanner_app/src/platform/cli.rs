use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use super::config::DEFAULT_CONFIG_FILE;
use super::logging::LogDestination;

/// Command-line arguments for media-scanner
#[derive(Parser, Debug)]
#[command(name = "media-scanner")]
#[command(about = "Terminal front end for the media source scanner service")]
#[command(version)]
pub struct Cli {
    /// RON settings file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "SCANNER_CONFIG")]
    pub config: PathBuf,

    /// Backend base URL, overrides the settings file
    #[arg(short, long, env = "SCANNER_BASE_URL")]
    pub base_url: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Maximum log level
    #[arg(long, default_value = "info", env = "SCANNER_LOG_LEVEL")]
    pub log_level: LevelFilter,

    /// Write the effective settings back to the settings file and continue
    #[arg(long)]
    pub write_config: bool,
}
