//! Ignore-list filtering.
//!
//! Directory roots may carry `META-INF/forge-bootstrap-ignore`, listing unit
//! names a host environment loads some other way. Every group resolving to a
//! listed name is removed. An empty marker means "ignore the unit I belong to".

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::{ClasspathTransformer, TransformError, WorkingSet};
use crate::consts::IGNORE_FILE;
use crate::identity::Resolver;
use crate::util::content_lines;

/// Removes units named by ignore marker files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreListFilter;

/// Unit names listed in a marker file.
pub fn parse_ignore_list(text: &str) -> Vec<String> {
  content_lines(text).map(str::to_string).collect()
}

impl ClasspathTransformer for IgnoreListFilter {
  fn name(&self) -> &str {
    "ignore-list"
  }

  fn process(&self, set: &mut WorkingSet, resolver: &Resolver) -> Result<bool, TransformError> {
    let mut ignored = BTreeSet::new();

    for group in set.groups() {
      let mut ignore_self = false;

      for root in group.iter().filter(|root| root.is_dir()) {
        let Some(data) = root.read_entry(IGNORE_FILE)? else {
          continue;
        };
        let names = parse_ignore_list(&String::from_utf8_lossy(&data));
        debug!(root = %root, names = ?names, "found ignore file");
        if names.is_empty() {
          ignore_self = true;
        }
        ignored.extend(names);
      }

      if ignore_self {
        match resolver.find_unit(group)?.and_then(|identity| identity.name) {
          Some(name) => {
            ignored.insert(name);
          }
          None => warn!(roots = ?group, "invalid ignore file, could not find unit name"),
        }
      }
    }

    if ignored.is_empty() {
      return Ok(false);
    }

    let mut kept = Vec::with_capacity(set.len());
    for group in set.groups() {
      let name = resolver.find_automatic(group)?.and_then(|identity| identity.name);
      if let Some(name) = name.filter(|name| ignored.contains(name)) {
        debug!(unit = %name, "ignoring unit");
        continue;
      }
      kept.push(group.clone());
    }

    if kept.len() == set.len() {
      return Ok(false);
    }
    set.replace(kept);
    Ok(true)
  }
}
