//! Candidate discovery inside a single content root.
//!
//! A root may carry a manifest and any number of unit descriptors: the base
//! variant at the root, plus version-qualified variants under
//! `META-INF/versions/<N>/` when the manifest declares itself multi-release.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipArchive;

use super::manifest::Manifest;
use crate::consts::{DESCRIPTOR, MANIFEST_PATH, META_INF, VERSION_DIR, VERSIONS};
use crate::root::{ContentRoot, RootError};

/// An embedded descriptor payload tagged with the feature version it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub version: u32,
  pub data: Vec<u8>,
  /// Where the payload was read from, for error messages.
  pub origin: PathBuf,
}

/// Everything identity resolution needs from one root.
#[derive(Debug, Default)]
pub struct Candidates {
  pub manifest: Option<Manifest>,
  pub descriptors: Vec<Candidate>,
}

/// Collect the manifest and the descriptor candidates eligible at `runtime_version`.
pub fn find_candidates(root: &ContentRoot, runtime_version: u32) -> Result<Candidates, RootError> {
  if root.is_dir() {
    from_directory(root.path(), runtime_version)
  } else {
    from_archive(root.path(), runtime_version)
  }
}

fn from_directory(dir: &Path, runtime_version: u32) -> Result<Candidates, RootError> {
  let manifest = match find_insensitive(dir, MANIFEST_PATH)? {
    Some(path) if path.is_file() => Some(Manifest::from_bytes(&read_file(&path)?)),
    _ => None,
  };

  let mut descriptors = Vec::new();
  let base = dir.join(DESCRIPTOR);
  if base.is_file() {
    descriptors.push(Candidate {
      version: 0,
      data: read_file(&base)?,
      origin: base,
    });
  }

  if manifest.as_ref().is_some_and(Manifest::is_multi_release)
    && let Some(versions) = find_insensitive(dir, &format!("{META_INF}/{VERSIONS}"))?
    && versions.is_dir()
  {
    let entries = fs::read_dir(&versions).map_err(|e| RootError::io(&versions, e))?;
    for entry in entries {
      let entry = entry.map_err(|e| RootError::io(&versions, e))?;
      // Non-numeric version directories are not variants
      let Some(version) = entry.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) else {
        continue;
      };
      let path = entry.path().join(DESCRIPTOR);
      if version <= runtime_version && path.is_file() {
        descriptors.push(Candidate {
          version,
          data: read_file(&path)?,
          origin: path,
        });
      }
    }
  }

  Ok(Candidates { manifest, descriptors })
}

fn from_archive(archive_path: &Path, runtime_version: u32) -> Result<Candidates, RootError> {
  let file = File::open(archive_path).map_err(|e| RootError::io(archive_path, e))?;
  let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| RootError::archive(archive_path, e))?;

  let mut manifest_entry = None;
  let mut base_entry = None;
  let mut versioned = Vec::new();
  for name in archive.file_names() {
    if name.eq_ignore_ascii_case(MANIFEST_PATH) {
      manifest_entry.get_or_insert_with(|| name.to_string());
    } else if name == DESCRIPTOR {
      base_entry = Some(name.to_string());
    } else if let Some(version) = versioned_descriptor(name) {
      versioned.push((version, name.to_string()));
    }
  }

  let manifest = match manifest_entry {
    Some(name) => Some(Manifest::from_bytes(&read_archive_entry(&mut archive, archive_path, &name)?)),
    None => None,
  };

  let mut descriptors = Vec::new();
  if let Some(name) = base_entry {
    descriptors.push(Candidate {
      version: 0,
      data: read_archive_entry(&mut archive, archive_path, &name)?,
      origin: archive_path.join(name),
    });
  }

  if manifest.as_ref().is_some_and(Manifest::is_multi_release) {
    for (version, name) in versioned {
      if version > runtime_version {
        continue;
      }
      descriptors.push(Candidate {
        version,
        data: read_archive_entry(&mut archive, archive_path, &name)?,
        origin: archive_path.join(name),
      });
    }
  }

  Ok(Candidates { manifest, descriptors })
}

/// Parse `META-INF/versions/<N>/unit.toml` (prefix matched ignoring case) into `N`.
fn versioned_descriptor(name: &str) -> Option<u32> {
  let prefix = name.get(..VERSION_DIR.len())?;
  if !prefix.eq_ignore_ascii_case(VERSION_DIR) {
    return None;
  }
  let (version, rest) = name[VERSION_DIR.len()..].split_once('/')?;
  if rest != DESCRIPTOR {
    return None;
  }
  version.parse().ok()
}

/// Resolve a `/`-separated relative path under `root`, ignoring ASCII case.
///
/// The exact spelling is tried first; otherwise the tree is scanned, descending
/// only into directories whose names match the corresponding component.
fn find_insensitive(root: &Path, relative: &str) -> Result<Option<PathBuf>, RootError> {
  let direct = root.join(relative);
  if direct.exists() {
    return Ok(Some(direct));
  }

  let wanted: Vec<&str> = relative.split('/').collect();
  // Every ancestor has to pass the filter, so no min_depth here: walkdir skips
  // the predicate for entries above it.
  let walker = WalkDir::new(root)
    .max_depth(wanted.len())
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| {
      let depth = entry.depth();
      depth == 0
        || entry
          .file_name()
          .to_str()
          .is_some_and(|name| name.eq_ignore_ascii_case(wanted[depth - 1]))
    });

  for entry in walker {
    let entry = entry.map_err(|e| RootError::io(root, e.into()))?;
    if entry.depth() == wanted.len() {
      return Ok(Some(entry.into_path()));
    }
  }
  Ok(None)
}

fn read_file(path: &Path) -> Result<Vec<u8>, RootError> {
  fs::read(path).map_err(|e| RootError::io(path, e))
}

fn read_archive_entry<R: Read + Seek>(
  archive: &mut ZipArchive<R>,
  archive_path: &Path,
  name: &str,
) -> Result<Vec<u8>, RootError> {
  let mut entry = archive.by_name(name).map_err(|e| RootError::archive(archive_path, e))?;
  let mut data = Vec::new();
  entry
    .read_to_end(&mut data)
    .map_err(|e| RootError::io(archive_path.join(name), e))?;
  Ok(data)
}
