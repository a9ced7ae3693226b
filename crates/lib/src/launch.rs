//! Entry-point discovery and invocation.
//!
//! Units declare the providers they offer in
//! `META-INF/services/bootlayer.EntryPoint`, one provider id per line. The
//! launcher collects declarations visible from the runtime layer, instantiates
//! them from the [`ProviderRegistry`], and runs the single one it finds.

use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{ENTRY_POINT, SERVICES_DIR};
use crate::context::ContextError;
use crate::layer::Layer;
use crate::registry::ProviderRegistry;
use crate::util::content_lines;

/// The capability the launcher looks for.
pub trait EntryPoint {
  /// Display name; defaults to the implementing type's name.
  fn name(&self) -> String {
    std::any::type_name::<Self>().to_string()
  }

  fn main(&self, args: &[String]) -> anyhow::Result<()>;
}

pub type EntryPoints = ProviderRegistry<dyn EntryPoint>;

#[derive(Debug, Error)]
pub enum LaunchError {
  #[error("could not find any {capability} providers")]
  NoEntryPoint { capability: String },

  #[error("found multiple {capability} providers: {}", .names.join(", "))]
  Ambiguous { capability: String, names: Vec<String> },

  #[error("provider '{id}' is declared but not registered")]
  UnknownProvider { id: String },

  #[error("entry point '{name}' failed")]
  ProviderFailed {
    name: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error(transparent)]
  Context(#[from] ContextError),
}

/// Provider ids declared for `capability` in `layer` and its ancestors.
///
/// Ids appear in discovery order: the layer's own units first, then each
/// ancestor nearest first. Duplicates are dropped.
pub fn discover_providers(layer: &Rc<Layer>, capability: &str) -> Result<Vec<String>, LaunchError> {
  let path = format!("{SERVICES_DIR}{capability}");
  let mut ids: Vec<String> = Vec::new();

  for current in layer.lineage() {
    for resource in current.context().find_local_resources(&path)? {
      let text = resource.text();
      for id in content_lines(&text) {
        if !ids.iter().any(|existing| existing == id) {
          debug!(layer = current.name(), root = %resource.root, provider = id, "declared provider");
          ids.push(id.to_string());
        }
      }
    }
  }

  Ok(ids)
}

/// Find exactly one entry point visible from `layer` and run it with `args`.
pub fn launch(layer: &Rc<Layer>, registry: &EntryPoints, args: &[String]) -> Result<(), LaunchError> {
  let ids = discover_providers(layer, ENTRY_POINT)?;
  if ids.is_empty() {
    return Err(LaunchError::NoEntryPoint {
      capability: ENTRY_POINT.to_string(),
    });
  }

  let mut providers = Vec::with_capacity(ids.len());
  for id in &ids {
    let provider = registry
      .create(id)
      .ok_or_else(|| LaunchError::UnknownProvider { id: id.clone() })?;
    providers.push(provider);
  }

  if providers.len() > 1 {
    return Err(LaunchError::Ambiguous {
      capability: ENTRY_POINT.to_string(),
      names: providers.iter().map(|p| p.name()).collect(),
    });
  }

  let Some(entry) = providers.pop() else {
    return Err(LaunchError::NoEntryPoint {
      capability: ENTRY_POINT.to_string(),
    });
  };
  let name = entry.name();
  info!(provider = %ids[0], name = %name, "starting");
  entry
    .main(args)
    .map_err(|source| LaunchError::ProviderFailed { name, source: source.into() })
}
