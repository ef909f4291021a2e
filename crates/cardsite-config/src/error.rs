use std::{
  io,
  path::{Path, PathBuf},
};

use thiserror::Error;

/// Error type for cardsite-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error(
    "Unknown configuration key: '{0}'. See the generated cardsite.toml for \
     supported keys."
  )]
  UnknownKey(String),

  #[error("Invalid value for '{key}': '{value}'. Expected {expected}")]
  InvalidValue {
    key:      String,
    value:    String,
    expected: &'static str,
  },

  #[error("Template error: {0}")]
  Template(String),

  #[error("Failed to {action} {}: {source}", .path.display())]
  Io {
    action: &'static str,
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to parse JSON config from {}: {source}", .path.display())]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to parse TOML config from {}: {source}", .path.display())]
  Toml {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl ConfigError {
  pub(crate) fn io(
    action: &'static str,
    path: &Path,
  ) -> impl FnOnce(io::Error) -> Self {
    move |source| {
      Self::Io {
        action,
        path: path.to_path_buf(),
        source,
      }
    }
  }
}
