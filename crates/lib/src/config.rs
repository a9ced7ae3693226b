//! Startup configuration.
//!
//! Defaults can be overridden from the environment with
//! [`BootstrapConfig::from_env`]; the CLI layers its own flags on top.

use std::path::PathBuf;

use thiserror::Error;

use crate::consts::FEATURE_VERSION;

pub const ENV_CLASSPATH: &str = "BOOTLAYER_CLASSPATH";
pub const ENV_DEBUG: &str = "BOOTLAYER_DEBUG";
pub const ENV_DEV_AUTO: &str = "BOOTLAYER_DEV_AUTO";
pub const ENV_DEV_EXPLICIT: &str = "BOOTLAYER_DEV_EXPLICIT";
pub const ENV_DEV_IGNORE: &str = "BOOTLAYER_DEV_IGNORE";
pub const ENV_UNIT_DIRS: &str = "BOOTLAYER_UNIT_DIRS";
pub const ENV_RUNTIME_VERSION: &str = "BOOTLAYER_RUNTIME_VERSION";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid value '{value}' for {var}")]
  InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
  /// Raw classpath entries, in order.
  pub classpath: Vec<PathBuf>,
  pub debug: bool,
  /// Merge source-set directories automatically.
  pub dev_auto: bool,
  /// Honor the explicit `[id%%]path` override list in `unit_dirs`.
  pub dev_explicit: bool,
  /// Apply ignore marker files.
  pub dev_ignore: bool,
  pub unit_dirs: Option<String>,
  /// Feature version used to select descriptor variants.
  pub runtime_version: u32,
}

impl Default for BootstrapConfig {
  fn default() -> Self {
    Self {
      classpath: Vec::new(),
      debug: false,
      dev_auto: true,
      dev_explicit: true,
      dev_ignore: true,
      unit_dirs: None,
      runtime_version: FEATURE_VERSION,
    }
  }
}

impl BootstrapConfig {
  /// Defaults overridden by any `BOOTLAYER_*` variables that are set.
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let classpath = std::env::var_os(ENV_CLASSPATH)
      .map(|value| split_classpath(&value.to_string_lossy()))
      .unwrap_or_default();

    let runtime_version = match std::env::var(ENV_RUNTIME_VERSION) {
      Ok(value) => parse_version(ENV_RUNTIME_VERSION, &value)?,
      Err(_) => defaults.runtime_version,
    };

    Ok(Self {
      classpath,
      debug: env_flag(ENV_DEBUG, defaults.debug),
      dev_auto: env_flag(ENV_DEV_AUTO, defaults.dev_auto),
      dev_explicit: env_flag(ENV_DEV_EXPLICIT, defaults.dev_explicit),
      dev_ignore: env_flag(ENV_DEV_IGNORE, defaults.dev_ignore),
      unit_dirs: std::env::var(ENV_UNIT_DIRS).ok().filter(|v| !v.trim().is_empty()),
      runtime_version,
    })
  }
}

/// Split a `PATH`-style string into entries, dropping blanks.
pub fn split_classpath(value: &str) -> Vec<PathBuf> {
  std::env::split_paths(value)
    .filter(|path| !path.as_os_str().is_empty())
    .collect()
}

/// Only `true`, ignoring case, is true. Unset keeps `default`.
pub fn env_flag(var: &str, default: bool) -> bool {
  match std::env::var(var) {
    Ok(value) => value.trim().eq_ignore_ascii_case("true"),
    Err(_) => default,
  }
}

pub fn parse_version(var: &str, value: &str) -> Result<u32, ConfigError> {
  value.trim().parse().map_err(|_| ConfigError::InvalidValue {
    var: var.to_string(),
    value: value.to_string(),
  })
}
