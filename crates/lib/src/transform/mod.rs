//! Classpath transformers.
//!
//! Transformers rewrite the working set (the ordered list of content-root
//! groups) before units are resolved. They run once each, in registration
//! order, over the same set; the pipeline reports a change if any of them did.

mod dev;
mod ignore;

pub use dev::{DevSourceSetMerger, parse_explicit};
pub use ignore::{IgnoreListFilter, parse_ignore_list};

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::config::BootstrapConfig;
use crate::identity::{IdentityError, Resolver};
use crate::root::{ContentRoot, RootError};

/// Errors that can occur while transforming the working set.
#[derive(Debug, Error)]
pub enum TransformError {
  #[error(transparent)]
  Identity(#[from] IdentityError),

  #[error(transparent)]
  Root(#[from] RootError),

  #[error("transformer '{name}' failed: {message}")]
  Failed { name: String, message: String },
}

/// The groups handed to transformers.
///
/// Each group is one classpath entry (or a merged unit) and holds at least one
/// root once normalized. Group order is classpath order, except that merged
/// groups are appended at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
  groups: Vec<Vec<ContentRoot>>,
}

impl WorkingSet {
  /// One single-root group per root.
  pub fn from_roots(roots: Vec<ContentRoot>) -> Self {
    Self::from_groups(roots.into_iter().map(|root| vec![root]).collect())
  }

  pub fn from_groups(groups: Vec<Vec<ContentRoot>>) -> Self {
    let mut set = Self { groups };
    set.normalize();
    set
  }

  pub fn groups(&self) -> &[Vec<ContentRoot>] {
    &self.groups
  }

  pub fn groups_mut(&mut self) -> &mut Vec<Vec<ContentRoot>> {
    &mut self.groups
  }

  /// Replace every group at once.
  pub fn replace(&mut self, groups: Vec<Vec<ContentRoot>>) {
    self.groups = groups;
  }

  pub fn push_group(&mut self, group: Vec<ContentRoot>) {
    self.groups.push(group);
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  /// Every root of every group, in order.
  pub fn roots(&self) -> impl Iterator<Item = &ContentRoot> {
    self.groups.iter().flatten()
  }

  /// Drop groups left empty by partial removals.
  pub fn normalize(&mut self) {
    self.groups.retain(|group| !group.is_empty());
  }

  /// Flat list of root paths, handy for logging and output.
  pub fn paths(&self) -> Vec<PathBuf> {
    self.roots().map(|root| root.path().to_path_buf()).collect()
  }
}

/// A hook that may rewrite the working set.
///
/// Implementations must be idempotent: running one again over a set it already
/// processed reports no change.
pub trait ClasspathTransformer {
  fn name(&self) -> &str;

  /// Rewrite `set` in place and report whether anything changed.
  fn process(&self, set: &mut WorkingSet, resolver: &Resolver) -> Result<bool, TransformError>;
}

/// Ordered transformer registry.
#[derive(Default)]
pub struct Pipeline {
  transformers: Vec<Box<dyn ClasspathTransformer>>,
}

impl Pipeline {
  pub fn new() -> Self {
    Self::default()
  }

  /// The development merger then the ignore-list filter, each only when enabled.
  pub fn with_defaults(config: &BootstrapConfig) -> Self {
    let mut pipeline = Self::new();
    if config.dev_auto || config.dev_explicit {
      let explicit = if config.dev_explicit {
        config.unit_dirs.clone()
      } else {
        None
      };
      pipeline.register(DevSourceSetMerger::new(config.dev_auto, explicit));
    }
    if config.dev_ignore {
      pipeline.register(IgnoreListFilter);
    }
    pipeline
  }

  pub fn register(&mut self, transformer: impl ClasspathTransformer + 'static) -> &mut Self {
    self.transformers.push(Box::new(transformer));
    self
  }

  pub fn names(&self) -> Vec<&str> {
    self.transformers.iter().map(|t| t.name()).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.transformers.is_empty()
  }

  /// Run every transformer over `set`.
  pub fn run(&self, set: &mut WorkingSet, resolver: &Resolver) -> Result<bool, TransformError> {
    let mut changed = false;
    for transformer in &self.transformers {
      debug!(transformer = transformer.name(), "running classpath transformer");
      let modified = transformer.process(set, resolver)?;
      set.normalize();
      if modified {
        debug!(transformer = transformer.name(), groups = set.len(), "classpath modified");
      }
      changed |= modified;
    }
    Ok(changed)
  }
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline").field("transformers", &self.names()).finish()
  }
}
