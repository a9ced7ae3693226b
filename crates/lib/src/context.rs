//! Loading contexts: named, isolated lookup scopes over content roots.
//!
//! A context searches its own groups first, then its parents in order. Inside a
//! group the last root wins, matching how a merged unit is flattened.

use std::rc::Rc;

use thiserror::Error;

use crate::root::{ContentRoot, RootError};
use crate::unit::ResolvedUnit;

pub const PLATFORM_CONTEXT: &str = "platform";

#[derive(Debug, Error)]
pub enum ContextError {
  #[error("context '{context}' failed to read '{path}': {source}")]
  Read {
    context: String,
    path: String,
    #[source]
    source: RootError,
  },
}

/// A resource found through a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
  /// The root that supplied it.
  pub root: ContentRoot,
  pub path: String,
  pub data: Vec<u8>,
}

impl Resource {
  pub fn text(&self) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(&self.data)
  }
}

#[derive(Debug)]
pub struct LoadContext {
  name: String,
  groups: Vec<Vec<ContentRoot>>,
  parents: Vec<Rc<LoadContext>>,
}

impl LoadContext {
  pub fn new(name: impl Into<String>, groups: Vec<Vec<ContentRoot>>, parents: Vec<Rc<LoadContext>>) -> Rc<Self> {
    Rc::new(Self {
      name: name.into(),
      groups,
      parents,
    })
  }

  /// The root of every context chain. Holds no content.
  pub fn platform() -> Rc<Self> {
    Self::new(PLATFORM_CONTEXT, Vec::new(), Vec::new())
  }

  /// A fresh context over the roots of `units`, parented only on `platform`.
  ///
  /// Nothing is inherited from whichever context is building it.
  pub fn isolated(name: impl Into<String>, units: &[ResolvedUnit], platform: &Rc<LoadContext>) -> Rc<Self> {
    let groups = units.iter().map(|unit| unit.roots.clone()).collect();
    Self::new(name, groups, vec![Rc::clone(platform)])
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn groups(&self) -> &[Vec<ContentRoot>] {
    &self.groups
  }

  pub fn parents(&self) -> &[Rc<LoadContext>] {
    &self.parents
  }

  /// Whether `name` appears anywhere in this context's parent chain.
  pub fn has_ancestor(&self, name: &str) -> bool {
    self
      .parents
      .iter()
      .any(|parent| parent.name == name || parent.has_ancestor(name))
  }

  /// First match for `path`: own groups in order, then parents.
  pub fn find_resource(&self, path: &str) -> Result<Option<Resource>, ContextError> {
    for group in &self.groups {
      if let Some(resource) = self.find_in_group(group, path)? {
        return Ok(Some(resource));
      }
    }

    for parent in &self.parents {
      if let Some(resource) = parent.find_resource(path)? {
        return Ok(Some(resource));
      }
    }

    Ok(None)
  }

  /// Every match for `path` among this context's own groups, one per group.
  pub fn find_local_resources(&self, path: &str) -> Result<Vec<Resource>, ContextError> {
    let mut found = Vec::new();
    for group in &self.groups {
      if let Some(resource) = self.find_in_group(group, path)? {
        found.push(resource);
      }
    }
    Ok(found)
  }

  fn find_in_group(&self, group: &[ContentRoot], path: &str) -> Result<Option<Resource>, ContextError> {
    for root in group.iter().rev() {
      let data = root.read_entry(path).map_err(|source| ContextError::Read {
        context: self.name.clone(),
        path: path.to_string(),
        source,
      })?;
      if let Some(data) = data {
        return Ok(Some(Resource {
          root: root.clone(),
          path: path.to_string(),
          data,
        }));
      }
    }
    Ok(None)
  }
}
