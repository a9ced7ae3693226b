//! Loading layers.
//!
//! A layer is a named set of units with a loading context and parent layers.
//! Names are unique within a layer, and a unit visible through a parent is
//! never placed again in a child.

mod builder;

pub use builder::{Boot, BootPolicy, LayerBuilder, Layers, Runtime};

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

use crate::context::LoadContext;
use crate::unit::ResolvedUnit;

pub const PLATFORM_LAYER: &str = "platform";
pub const BOOT_LAYER: &str = "boot";
pub const RUNTIME_LAYER: &str = "runtime";

#[derive(Debug, Error)]
pub enum LayerError {
  #[error("required boot unit '{name}' was not found on the classpath")]
  MissingBootUnit { name: String },

  #[error("unit '{name}' appears more than once in the {layer} layer")]
  DuplicateUnit { layer: String, name: String },
}

#[derive(Debug)]
pub struct Layer {
  name: String,
  units: BTreeMap<String, ResolvedUnit>,
  anonymous: Vec<ResolvedUnit>,
  parents: Vec<Rc<Layer>>,
  context: Rc<LoadContext>,
}

impl Layer {
  /// Build a layer, rejecting duplicate unit names.
  pub(crate) fn new(
    name: &str,
    contents: Vec<ResolvedUnit>,
    parents: Vec<Rc<Layer>>,
    context: Rc<LoadContext>,
  ) -> Result<Self, LayerError> {
    let mut units = BTreeMap::new();
    let mut anonymous = Vec::new();

    for unit in contents {
      let Some(unit_name) = unit.name().map(str::to_string) else {
        anonymous.push(unit);
        continue;
      };
      if units.contains_key(&unit_name) {
        return Err(LayerError::DuplicateUnit {
          layer: name.to_string(),
          name: unit_name,
        });
      }
      units.insert(unit_name, unit);
    }

    Ok(Self {
      name: name.to_string(),
      units,
      anonymous,
      parents,
      context,
    })
  }

  /// The empty, parentless layer every chain ends in.
  pub fn platform(context: Rc<LoadContext>) -> Rc<Self> {
    Rc::new(Self {
      name: PLATFORM_LAYER.to_string(),
      units: BTreeMap::new(),
      anonymous: Vec::new(),
      parents: Vec::new(),
      context,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn context(&self) -> &Rc<LoadContext> {
    &self.context
  }

  pub fn parents(&self) -> &[Rc<Layer>] {
    &self.parents
  }

  /// Named units defined directly in this layer, by name.
  pub fn units(&self) -> impl Iterator<Item = &ResolvedUnit> {
    self.units.values()
  }

  pub fn unit_names(&self) -> impl Iterator<Item = &str> {
    self.units.keys().map(String::as_str)
  }

  /// Unnamed content placed in this layer.
  pub fn anonymous(&self) -> &[ResolvedUnit] {
    &self.anonymous
  }

  pub fn contains(&self, name: &str) -> bool {
    self.units.contains_key(name)
  }

  /// Look a unit up here, then through the parents.
  pub fn find_unit(&self, name: &str) -> Option<&ResolvedUnit> {
    self
      .units
      .get(name)
      .or_else(|| self.parents.iter().find_map(|parent| parent.find_unit(name)))
  }

  /// This layer followed by every ancestor, each once, nearest first.
  pub fn lineage(self: &Rc<Self>) -> Vec<Rc<Layer>> {
    let mut out: Vec<Rc<Layer>> = vec![Rc::clone(self)];
    let mut next = 0;
    while next < out.len() {
      let parents = out[next].parents.clone();
      for parent in parents {
        if !out.iter().any(|seen| Rc::ptr_eq(seen, &parent)) {
          out.push(parent);
        }
      }
      next += 1;
    }
    out
  }

  pub fn summary(&self) -> LayerSummary {
    LayerSummary {
      name: self.name.clone(),
      parents: self.parents.iter().map(|p| p.name.clone()).collect(),
      units: self.units.values().cloned().collect(),
      anonymous: self.anonymous.clone(),
    }
  }
}

/// Serializable view of a layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
  pub name: String,
  pub parents: Vec<String>,
  pub units: Vec<ResolvedUnit>,
  pub anonymous: Vec<ResolvedUnit>,
}
