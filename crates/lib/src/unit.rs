//! Resolved units: one identity plus the ordered roots that make it up.

use serde::Serialize;
use tracing::debug;

use crate::identity::{IdentityError, Resolver, UnitIdentity};
use crate::root::ContentRoot;
use crate::transform::WorkingSet;

/// A logical unit and its content roots.
///
/// Later roots win on conflicting paths when the unit's content is flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUnit {
  pub identity: UnitIdentity,
  pub roots: Vec<ContentRoot>,
}

impl ResolvedUnit {
  pub fn name(&self) -> Option<&str> {
    self.identity.name.as_deref()
  }

  pub fn version(&self) -> Option<&str> {
    self.identity.version.as_deref()
  }

  /// The root that takes precedence when the unit is flattened.
  pub fn primary_root(&self) -> Option<&ContentRoot> {
    self.roots.last()
  }

  /// Unit name, or the primary root's path for unnamed content.
  pub fn display_name(&self) -> String {
    match (self.name(), self.primary_root()) {
      (Some(name), _) => name.to_string(),
      (None, Some(root)) => root.to_string(),
      (None, None) => String::from("<empty>"),
    }
  }
}

/// Resolve every group of the working set into a unit, preserving order.
///
/// Groups that name nothing (not even through their file name) stay as
/// unnamed units. Groups naming a unit already seen are merged into it: the
/// first group keeps the identity and position, later roots are appended.
pub fn resolve_units(set: &WorkingSet, resolver: &Resolver) -> Result<Vec<ResolvedUnit>, IdentityError> {
  let mut units: Vec<ResolvedUnit> = Vec::with_capacity(set.len());

  for group in set.groups() {
    let identity = resolver.find_automatic(group)?.unwrap_or_default();

    if let Some(name) = identity.name.as_deref()
      && let Some(unit) = units.iter_mut().find(|unit| unit.name() == Some(name))
    {
      debug!(unit = %name, roots = ?group, "merging roots into unit");
      for root in group {
        if !unit.roots.contains(root) {
          unit.roots.push(root.clone());
        }
      }
      continue;
    }

    units.push(ResolvedUnit {
      identity,
      roots: group.clone(),
    });
  }

  Ok(units)
}
