//! Store configuration.
//!
//! Values come from an optional TOML file, overridden by `LOVERS_*`
//! environment variables (e.g. `LOVERS_PATH`, `LOVERS_BUSY_TIMEOUT_MS`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Database file. `None` opens a private in-memory database.
  #[serde(default)]
  pub path:            Option<PathBuf>,
  /// How long a connection waits for another writer's lock.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
  /// Extra attempts for a status append that lost a race for its position.
  #[serde(default = "default_append_retries")]
  pub append_retries:  u32,
}

fn default_busy_timeout_ms() -> u64 { 5_000 }

fn default_append_retries() -> u32 { 5 }

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      path:            None,
      busy_timeout_ms: default_busy_timeout_ms(),
      append_retries:  default_append_retries(),
    }
  }
}

impl StoreConfig {
  /// Defaults, pointed at a database file.
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: Some(path.into()), ..Self::default() }
  }

  /// Load from `file` (if given and present) and the environment.
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(file) = file {
      builder = builder.add_source(config::File::from(file).required(false));
    }
    let settings = builder
      .add_source(config::Environment::with_prefix("LOVERS"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }
}
