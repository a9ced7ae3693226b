//! Content roots and classpath discovery.
//!
//! A content root is one filesystem location supplying loadable content:
//! either a directory tree or a single zip archive. Its identity is its
//! canonical absolute path.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

/// Errors raised while reading a content root.
#[derive(Debug, Error)]
pub enum RootError {
  #[error("failed to read '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read archive '{path}': {source}")]
  Archive {
    path: PathBuf,
    #[source]
    source: ZipError,
  },
}

impl RootError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    RootError::Io {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn archive(path: impl Into<PathBuf>, source: ZipError) -> Self {
    RootError::Archive {
      path: path.into(),
      source,
    }
  }
}

/// One directory tree or archive file on the classpath.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentRoot(PathBuf);

impl ContentRoot {
  /// Wrap a path that is already canonical.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self(path.into())
  }

  /// Canonicalize `path` and wrap it.
  pub fn canonical(path: &Path) -> io::Result<Self> {
    dunce::canonicalize(path).map(Self)
  }

  pub fn path(&self) -> &Path {
    &self.0
  }

  pub fn is_dir(&self) -> bool {
    self.0.is_dir()
  }

  /// Final path component, if it is valid UTF-8.
  pub fn file_name(&self) -> Option<&str> {
    self.0.file_name().and_then(|n| n.to_str())
  }

  /// Read the entry at `relative` (a `/`-separated path) from this root.
  ///
  /// Returns `Ok(None)` when the entry does not exist.
  pub fn read_entry(&self, relative: &str) -> Result<Option<Vec<u8>>, RootError> {
    if self.is_dir() {
      let path = self.0.join(relative);
      if !path.is_file() {
        return Ok(None);
      }
      return fs::read(&path).map(Some).map_err(|e| RootError::io(path, e));
    }

    let file = File::open(&self.0).map_err(|e| RootError::io(&self.0, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| RootError::archive(&self.0, e))?;
    let mut entry = match archive.by_name(relative) {
      Ok(entry) => entry,
      Err(ZipError::FileNotFound) => return Ok(None),
      Err(e) => return Err(RootError::archive(&self.0, e)),
    };
    if entry.is_dir() {
      return Ok(None);
    }

    let mut data = Vec::new();
    entry
      .read_to_end(&mut data)
      .map_err(|e| RootError::io(self.0.join(relative), e))?;
    Ok(Some(data))
  }
}

impl AsRef<Path> for ContentRoot {
  fn as_ref(&self) -> &Path {
    &self.0
  }
}

impl fmt::Display for ContentRoot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.display())
  }
}

/// Turn raw classpath entries into content roots, in classpath order.
///
/// Entries are canonicalized. Entries that do not exist and directories that
/// are empty are skipped; any other I/O failure is returned.
pub fn find_classpath_entries(classpath: &[PathBuf]) -> Result<Vec<ContentRoot>, RootError> {
  let mut roots = Vec::with_capacity(classpath.len());

  for entry in classpath {
    if entry.as_os_str().is_empty() {
      continue;
    }

    let root = match ContentRoot::canonical(entry) {
      Ok(root) => root,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %entry.display(), "skipping missing classpath entry");
        continue;
      }
      Err(e) => return Err(RootError::io(entry, e)),
    };

    if root.is_dir() {
      let mut children = fs::read_dir(root.path()).map_err(|e| RootError::io(root.path(), e))?;
      if children.next().is_none() {
        debug!(path = %root, "skipping empty classpath directory");
        continue;
      }
    }

    if !roots.contains(&root) {
      roots.push(root);
    }
  }

  Ok(roots)
}
