//! Development-time source-set merging.
//!
//! IDE and build-tool output splits one logical unit across several
//! directories (`bin/<set>`, `build/resources/<set>`,
//! `build/classes/<lang>/<set>`). This transformer puts them back together:
//! - Explicit channel: an `[id%%]path` list names directories to merge directly
//! - Automatic channel: directories are grouped by `(project, source set)`;
//!   a group overrides a packaged unit of the same name, or becomes a unit of
//!   its own when it asks for the boot layer

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ClasspathTransformer, TransformError, WorkingSet};
use crate::consts::DEFAULT_GROUP_ID;
use crate::identity::Resolver;
use crate::root::ContentRoot;

/// Leftover Eclipse output directory that never holds real content.
const STALE_SOURCE_SET: &str = "default";

/// Merges split source-set output directories into units.
#[derive(Debug, Clone, Default)]
pub struct DevSourceSetMerger {
  auto: bool,
  explicit: Option<String>,
}

impl DevSourceSetMerger {
  /// `explicit` is the raw `[id%%]path` list, separated like `PATH`.
  pub fn new(auto: bool, explicit: Option<String>) -> Self {
    Self { auto, explicit }
  }
}

impl ClasspathTransformer for DevSourceSetMerger {
  fn name(&self) -> &str {
    "dev"
  }

  fn process(&self, set: &mut WorkingSet, resolver: &Resolver) -> Result<bool, TransformError> {
    let mut changed = false;

    if let Some(declaration) = self.explicit.as_deref().filter(|s| !s.trim().is_empty()) {
      changed |= process_explicit(declaration, set);
    }

    if self.auto {
      changed |= process_auto(set, resolver)?;
    }

    Ok(changed)
  }
}

/// Parse an explicit override list into `(id, paths)` groups.
///
/// Groups keep the order their id first appears in; duplicate paths within a
/// group are dropped. Entries without an id share [`DEFAULT_GROUP_ID`].
pub fn parse_explicit(declaration: &str) -> Vec<(String, Vec<PathBuf>)> {
  let mut groups: Vec<(String, Vec<PathBuf>)> = Vec::new();

  for entry in std::env::split_paths(declaration) {
    let text = entry.to_string_lossy();
    if text.trim().is_empty() {
      continue;
    }

    let (id, path) = match text.split_once("%%") {
      Some((id, path)) => (id, path),
      None => (DEFAULT_GROUP_ID, &*text),
    };
    let path = absolute_path(Path::new(path));

    match groups.iter_mut().find(|(existing, _)| existing.as_str() == id) {
      Some((_, paths)) => {
        if !paths.contains(&path) {
          paths.push(path);
        }
      }
      None => groups.push((id.to_string(), vec![path])),
    }
  }

  groups
}

fn absolute_path(path: &Path) -> PathBuf {
  let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
  dunce::canonicalize(&absolute).unwrap_or(absolute)
}

fn process_explicit(declaration: &str, set: &mut WorkingSet) -> bool {
  let mut merged = parse_explicit(declaration);
  // A single path needs no merging
  merged.retain(|(_, paths)| paths.len() > 1);
  if merged.is_empty() {
    return false;
  }

  for (id, paths) in &merged {
    debug!(id = %id, paths = ?paths, "explicit unit directories");
  }

  let claimed: HashSet<&Path> = merged
    .iter()
    .flat_map(|(_, paths)| paths.iter().map(PathBuf::as_path))
    .collect();
  let mut groups: Vec<Vec<ContentRoot>> = set
    .groups()
    .iter()
    .map(|group| {
      group
        .iter()
        .filter(|root| !claimed.contains(root.path()))
        .cloned()
        .collect::<Vec<_>>()
    })
    .filter(|group| !group.is_empty())
    .collect();

  for (_, paths) in merged {
    groups.push(paths.into_iter().map(ContentRoot::new).collect());
  }

  if groups == set.groups() {
    return false;
  }
  set.replace(groups);
  true
}

/// Project a source-set directory belongs to, from its build layout.
///
/// `None` when the directory matches no known layout.
fn classify(dir: &Path) -> Option<String> {
  let project_level = match ancestor_name(dir, 1) {
    // Eclipse: <project>/bin/<set>
    Some("bin") => 2,
    // Gradle/IntelliJ resources: <project>/build/resources/<set>
    Some("resources") => 3,
    // Gradle/IntelliJ classes: <project>/build/classes/<lang>/<set>
    _ if ancestor_name(dir, 2) == Some("classes") => 4,
    _ => return None,
  };

  match ancestor_name(dir, project_level) {
    Some(project) => Some(project.to_string()),
    None => {
      debug!(path = %dir.display(), "source set directory too shallow for a project name");
      Some(DEFAULT_GROUP_ID.to_string())
    }
  }
}

fn ancestor_name(path: &Path, levels: usize) -> Option<&str> {
  path.ancestors().nth(levels)?.file_name()?.to_str()
}

fn process_auto(set: &mut WorkingSet, resolver: &Resolver) -> Result<bool, TransformError> {
  let mut source_sets: BTreeMap<(String, String), Vec<ContentRoot>> = BTreeMap::new();
  let mut units: BTreeMap<String, Vec<ContentRoot>> = BTreeMap::new();
  let mut modified: Vec<Vec<ContentRoot>> = Vec::with_capacity(set.len());

  for group in set.groups() {
    let [root] = group.as_slice() else {
      modified.push(group.clone());
      continue;
    };

    if root.is_dir() {
      let Some(source_set) = root.file_name() else {
        modified.push(group.clone());
        continue;
      };
      if source_set == STALE_SOURCE_SET {
        continue;
      }

      match classify(root.path()) {
        Some(project) => {
          let dirs = source_sets.entry((project, source_set.to_string())).or_default();
          if !dirs.contains(root) {
            dirs.push(root.clone());
          }
        }
        None => modified.push(group.clone()),
      }
    } else {
      let identity = resolver.resolve(root)?;
      let Some(name) = identity.name else {
        debug!(root = %root, "not a unit");
        modified.push(group.clone());
        continue;
      };

      units.entry(name).or_default().push(root.clone());
    }
  }

  let mut changed = false;

  for ((project, source_set), dirs) in source_sets {
    let found = resolver
      .find_unit(&dirs)?
      .and_then(|identity| Some((identity.name.clone()?, identity)));
    let Some((name, identity)) = found else {
      debug!(project = %project, source_set = %source_set, dirs = ?dirs, "source set is not a unit");
      modified.extend(dirs.into_iter().map(|dir| vec![dir]));
      continue;
    };

    if let Some(roots) = units.get_mut(&name) {
      // The packaged roots are dropped whole, version included
      debug!(unit = %name, old = ?roots, new = ?dirs, "overriding packaged unit");
      *roots = dirs;
      changed = true;
    } else if identity.wants_boot() {
      debug!(unit = %name, dirs = ?dirs, "forcing source set into a unit");
      units.insert(name, dirs);
      changed = true;
    } else {
      modified.extend(dirs.into_iter().map(|dir| vec![dir]));
    }
  }

  if !changed {
    return Ok(false);
  }

  modified.extend(units.into_values());
  if modified == set.groups() {
    return Ok(false);
  }

  set.replace(modified);
  Ok(true)
}
