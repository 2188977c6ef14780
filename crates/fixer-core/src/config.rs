//! Configuration types for s3-format-fixer.
//!
//! [`Config::load`] reads `~/.config/s3-format-fixer/config.toml`, creating
//! it with hardcoded defaults if it does not yet exist. [`Config::load_from`]
//! reads an explicit file layered over the same defaults, and
//! [`Config::defaults`] returns the defaults without touching the filesystem
//! (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::EpochUnit;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[store]
region = "us-east-1"
prefix = "XBO_CI_DEVICE"
# Cap on keys taken from one listing. Unset means list everything.
# max_keys = 10000

[codec]
timestamp_unit = "millis"

[batch]
concurrency = 8
dry_run     = false
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/s3-format-fixer/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// `[store]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub max_keys: Option<usize>,
}

fn default_region() -> String { "us-east-1".to_string() }
fn default_prefix() -> String { "XBO_CI_DEVICE".to_string() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            prefix: default_prefix(),
            max_keys: None,
        }
    }
}

/// `[codec]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub timestamp_unit: EpochUnit,
}

/// `[batch]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_concurrency() -> usize { 8 }

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            dry_run: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/s3-format-fixer/config.toml`, layered on top of
    /// the built-in defaults. Creates the file with defaults if it does not
    /// exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit config file layered on top of the built-in defaults.
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.batch.concurrency >= 1, "batch.concurrency must be at least 1");
        anyhow::ensure!(self.store.max_keys != Some(0), "store.max_keys must be at least 1 when set");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("s3-format-fixer")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
