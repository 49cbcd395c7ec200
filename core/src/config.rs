//! Boot configuration
//!
//! Every field has a default, and with no config file the defaults are the
//! fixed device layout: a LittleFS volume labelled `storage` mounted at
//! `/storage`, libraries under `/storage/mrblib`, entrypoint
//! `/storage/main.rb`. A TOML file can override any of it, which is how
//! the host runner points the boot at a plain directory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::DiscoveryOrder;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub scripts: ScriptsConfig,
    pub task: TaskConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where the volume is mounted
    pub root: PathBuf,
    pub partition_label: String,
    /// Format the partition when mounting fails
    pub format_if_mount_failed: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/storage"),
            partition_label: "storage".to_string(),
            format_if_mount_failed: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Library directory, relative to the storage root unless absolute
    pub library_dir: PathBuf,
    /// Entrypoint script, relative to the storage root unless absolute
    pub entrypoint: PathBuf,
    /// File name suffix that marks a script
    pub suffix: String,
    pub order: DiscoveryOrder,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("mrblib"),
            entrypoint: PathBuf::from("main.rb"),
            suffix: ".rb".to_string(),
            order: DiscoveryOrder::default(),
        }
    }
}

/// The execution unit that hosts script loading
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub name: String,
    /// Stack size in bytes
    pub stack_size: usize,
    /// How long each idle yield lasts
    pub idle_interval_ms: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            name: "mruby_task".to_string(),
            stack_size: 16384,
            idle_interval_ms: 10,
        }
    }
}

impl TaskConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive for the fmt subscriber, e.g. `info` or
    /// `mrboot_core=debug`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load the defaults, validated
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    /// Absolute library directory
    pub fn library_dir(&self) -> PathBuf {
        self.storage.root.join(&self.scripts.library_dir)
    }

    /// Absolute entrypoint path
    pub fn entrypoint(&self) -> PathBuf {
        self.storage.root.join(&self.scripts.entrypoint)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.partition_label.is_empty() {
            bail!("storage.partition_label must not be empty");
        }
        if self.scripts.suffix.is_empty() {
            bail!("scripts.suffix must not be empty");
        }
        if self.scripts.entrypoint.as_os_str().is_empty() {
            bail!("scripts.entrypoint must not be empty");
        }
        if self.task.stack_size == 0 {
            bail!("task.stack_size must be greater than zero");
        }
        if self.task.idle_interval_ms == 0 {
            bail!("task.idle_interval_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Builder applying file and explicit overrides on top of the defaults
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    storage_root: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Read overrides from a TOML file
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Override the storage root (takes precedence over the file)
    pub fn storage_root(mut self, root: Option<PathBuf>) -> Self {
        self.storage_root = root;
        self
    }

    pub fn build(self) -> Result<Config> {
        let mut builder = config::Config::builder();
        if let Some(path) = &self.config_path {
            builder = builder.add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let mut config: Config = builder
            .build()
            .and_then(|raw| raw.try_deserialize())
            .with_context(|| match &self.config_path {
                Some(path) => format!("Failed to load config file {}", path.display()),
                None => "Failed to load default configuration".to_string(),
            })?;

        if let Some(root) = self.storage_root {
            config.storage.root = root;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
