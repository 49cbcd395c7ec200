use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::convert::Infallible;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::boot;
use crate::config::{Config, LogConfig};
use crate::interpreter::ScriptVm;
use crate::storage::DirectoryMount;

#[derive(Parser)]
#[command(name = "mrboot")]
#[command(about = "Boot a volume of Ruby scripts on the resident interpreter", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides the built-in device layout)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory standing in for the mounted volume (overrides config file)
    #[arg(long)]
    pub storage_root: Option<PathBuf>,
}

/// Run the boot on this host; returns only on a fatal error
pub fn run_cli() -> Result<Infallible> {
    let cli = Cli::parse();

    let config = Config::builder()
        .config_path(cli.config)
        .storage_root(cli.storage_root)
        .build()?;

    init_logging(&config.log)?;

    let never = boot::run(config, DirectoryMount, ScriptVm::new).context("Boot failed")?;
    match never {}
}

/// Install the fmt subscriber for the configured level
pub fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&log.level)
        .with_context(|| format!("Invalid log level '{}'", log.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("Failed to install log subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_overrides() {
        let cli = Cli::try_parse_from(["mrboot", "--storage-root", "/tmp/vol", "--config", "boot.toml"]).unwrap();
        assert_eq!(cli.storage_root, Some(PathBuf::from("/tmp/vol")));
        assert_eq!(cli.config, Some(PathBuf::from("boot.toml")));
    }

    #[test]
    fn test_no_flags_needed() {
        let cli = Cli::try_parse_from(["mrboot"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.storage_root.is_none());
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let log = LogConfig {
            level: "mrboot_core=notalevel".to_string(),
        };
        assert!(init_logging(&log).is_err());
    }
}
