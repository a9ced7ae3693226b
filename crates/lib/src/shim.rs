//! Launcher shim resources.
//!
//! A packaged distribution ships two files next to the launcher:
//! - `bootstrap-shim.list`: `sha256<TAB>id<TAB>path` per library, with paths
//!   relative to `libraries/`
//! - `bootstrap-shim.properties`: `Runtime-Version` (minimum feature version)
//!   and `Arguments` (prepended to the program arguments)

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BootstrapConfig;
use crate::consts::{SHIM_LIBRARIES, SHIM_LIST, SHIM_PROPERTIES};

const RUNTIME_VERSION_KEY: &str = "Runtime-Version";
const ARGUMENTS_KEY: &str = "Arguments";

#[derive(Debug, Error)]
pub enum ShimError {
  #[error("missing shim resource '{path}'")]
  MissingResource { path: PathBuf },

  #[error("failed to read '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed entry on line {line} of bootstrap-shim.list: '{text}'")]
  MalformedEntry { line: usize, text: String },

  #[error("missing {} required libraries, see log", .paths.len())]
  MissingLibraries { paths: Vec<PathBuf> },

  #[error("invalid value '{value}' for shim property {key}")]
  InvalidProperty { key: String, value: String },

  #[error("running feature version is {current} but at least {required} is required")]
  RuntimeTooOld { required: u32, current: u32 },
}

/// One library listed by the shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimLibrary {
  pub sha256: String,
  pub id: String,
  /// Absolute location under the `libraries/` directory.
  pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShimManifest {
  pub libraries: Vec<ShimLibrary>,
  pub runtime_version: Option<u32>,
  pub arguments: Vec<String>,
}

impl ShimManifest {
  /// Load both shim files from `dir`. Every listed library must exist.
  pub fn load(dir: &Path) -> Result<Self, ShimError> {
    let list = read_resource(&dir.join(SHIM_LIST))?;
    let libraries = parse_list(&list, &dir.join(SHIM_LIBRARIES))?;

    let missing: Vec<PathBuf> = libraries
      .iter()
      .filter(|library| !library.path.exists())
      .map(|library| library.path.clone())
      .collect();
    for path in &missing {
      warn!(path = %path.display(), "missing required library");
    }
    if !missing.is_empty() {
      return Err(ShimError::MissingLibraries { paths: missing });
    }

    let properties = parse_properties(&read_resource(&dir.join(SHIM_PROPERTIES))?);
    let runtime_version = properties
      .get(RUNTIME_VERSION_KEY)
      .map(|value| {
        value.parse::<u32>().map_err(|_| ShimError::InvalidProperty {
          key: RUNTIME_VERSION_KEY.to_string(),
          value: value.clone(),
        })
      })
      .transpose()?;
    let arguments = properties
      .get(ARGUMENTS_KEY)
      .map(|value| value.split(' ').filter(|a| !a.is_empty()).map(str::to_string).collect())
      .unwrap_or_default();

    debug!(libraries = libraries.len(), ?runtime_version, ?arguments, "loaded shim");
    Ok(Self {
      libraries,
      runtime_version,
      arguments,
    })
  }

  /// Fail when the shim needs a newer feature version than `current`.
  pub fn check_runtime(&self, current: u32) -> Result<(), ShimError> {
    match self.runtime_version {
      Some(required) if required > current => Err(ShimError::RuntimeTooOld { required, current }),
      _ => Ok(()),
    }
  }

  /// Gate on the configured feature version, then append the libraries to the classpath.
  pub fn apply(&self, config: &mut BootstrapConfig) -> Result<(), ShimError> {
    self.check_runtime(config.runtime_version)?;
    config.classpath.extend(self.classpath());
    Ok(())
  }

  /// Library paths to append to the classpath.
  pub fn classpath(&self) -> Vec<PathBuf> {
    self.libraries.iter().map(|library| library.path.clone()).collect()
  }

  /// Shim arguments followed by `args`.
  pub fn apply_arguments(&self, args: Vec<String>) -> Vec<String> {
    self.arguments.iter().cloned().chain(args).collect()
  }
}

fn read_resource(path: &Path) -> Result<String, ShimError> {
  match fs::read_to_string(path) {
    Ok(text) => Ok(text),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ShimError::MissingResource {
      path: path.to_path_buf(),
    }),
    Err(source) => Err(ShimError::Io {
      path: path.to_path_buf(),
      source,
    }),
  }
}

fn parse_list(text: &str, libraries_dir: &Path) -> Result<Vec<ShimLibrary>, ShimError> {
  let mut libraries = Vec::new();
  for (index, line) in text.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    let mut parts = line.splitn(3, '\t');
    let (Some(sha256), Some(id), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
      return Err(ShimError::MalformedEntry {
        line: index + 1,
        text: line.to_string(),
      });
    };
    libraries.push(ShimLibrary {
      sha256: sha256.to_string(),
      id: id.to_string(),
      path: libraries_dir.join(path.trim_end()),
    });
  }
  Ok(libraries)
}

/// `key=value` / `key: value` lines; `#` and `!` start comments.
fn parse_properties(text: &str) -> BTreeMap<String, String> {
  let mut properties = BTreeMap::new();
  for line in text.lines() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
      continue;
    }
    let Some(split) = line.find(['=', ':']) else {
      properties.insert(line.to_string(), String::new());
      continue;
    };
    let key = line[..split].trim();
    let value = line[split + 1..].trim();
    properties.insert(key.to_string(), value.to_string());
  }
  properties
}
