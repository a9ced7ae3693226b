//! Unit identity resolution.
//!
//! Works out which named, versioned unit a content root belongs to:
//! 1. Read the manifest main section (case-insensitive lookup)
//! 2. Collect descriptor candidates: the base variant, plus version-qualified
//!    variants when the manifest is multi-release
//! 3. Select the highest variant not exceeding the running feature version
//! 4. The descriptor's name and version win over the manifest's automatic name
//! 5. The layer hint comes from the manifest regardless of how the name was found
//!
//! Results are memoized per root on the [`Resolver`].

pub mod automatic;
pub mod descriptor;
pub mod manifest;
pub mod source;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::Utf8Error;

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::consts::BOOT_LAYER_HINT;
use crate::root::{ContentRoot, RootError};
use descriptor::{UnitDescriptor, select_variant};
use source::find_candidates;

/// Name, version and layer hint of a content root.
///
/// `name == None` means the root is not a named unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitIdentity {
  pub name: Option<String>,
  pub version: Option<String>,
  pub layer: Option<String>,
}

impl UnitIdentity {
  pub fn is_named(&self) -> bool {
    self.name.is_some()
  }

  /// Whether the root opted into the boot layer.
  pub fn wants_boot(&self) -> bool {
    self.layer.as_deref() == Some(BOOT_LAYER_HINT)
  }
}

/// Errors that can occur while resolving an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error(transparent)]
  Root(#[from] RootError),

  #[error("invalid unit descriptor '{path}': {source}")]
  Descriptor {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("unit descriptor '{path}' is not valid UTF-8: {source}")]
  DescriptorEncoding {
    path: PathBuf,
    #[source]
    source: Utf8Error,
  },

  #[error("unit descriptor '{path}' has an empty name")]
  EmptyName { path: PathBuf },
}

/// Identity resolver with a per-root memo.
///
/// One resolver is shared by every phase of a startup so that a root is read
/// at most once.
#[derive(Debug)]
pub struct Resolver {
  runtime_version: u32,
  cache: RefCell<HashMap<ContentRoot, UnitIdentity>>,
}

impl Resolver {
  pub fn new(runtime_version: u32) -> Self {
    Self {
      runtime_version,
      cache: RefCell::new(HashMap::new()),
    }
  }

  pub fn runtime_version(&self) -> u32 {
    self.runtime_version
  }

  /// Number of roots resolved so far.
  pub fn cached(&self) -> usize {
    self.cache.borrow().len()
  }

  /// Resolve one root. I/O and descriptor failures are returned as errors.
  pub fn resolve(&self, root: &ContentRoot) -> Result<UnitIdentity, IdentityError> {
    if let Some(identity) = self.cache.borrow().get(root) {
      return Ok(identity.clone());
    }

    let identity = self.resolve_uncached(root)?;
    trace!(root = %root, name = ?identity.name, version = ?identity.version, "resolved identity");
    self.cache.borrow_mut().insert(root.clone(), identity.clone());
    Ok(identity)
  }

  fn resolve_uncached(&self, root: &ContentRoot) -> Result<UnitIdentity, IdentityError> {
    let found = find_candidates(root, self.runtime_version)?;

    let mut identity = UnitIdentity::default();
    if let Some(manifest) = &found.manifest {
      identity.name = manifest.automatic_name().map(str::to_string);
      identity.layer = manifest.layer().map(str::to_string);
    }

    if let Some(variant) = select_variant(found.descriptors, self.runtime_version) {
      let descriptor = UnitDescriptor::parse(&variant.data, &variant.origin)?;
      identity.name = Some(descriptor.name);
      identity.version = descriptor.version;
    }

    Ok(identity)
  }

  /// Identity of a group of roots: the first named root wins.
  pub fn find_unit(&self, roots: &[ContentRoot]) -> Result<Option<UnitIdentity>, IdentityError> {
    for root in roots {
      let identity = self.resolve(root)?;
      if identity.is_named() {
        return Ok(Some(identity));
      }
    }
    Ok(None)
  }

  /// Like [`find_unit`](Self::find_unit), falling back to the file name when
  /// the group is exactly one archive.
  pub fn find_automatic(&self, roots: &[ContentRoot]) -> Result<Option<UnitIdentity>, IdentityError> {
    if let Some(identity) = self.find_unit(roots)? {
      return Ok(Some(identity));
    }

    match roots {
      [single] if !single.is_dir() => Ok(automatic::from_file_name(single.path())),
      _ => Ok(None),
    }
  }
}
