//! `unit.toml` descriptors and variant selection.

use std::path::Path;

use serde::Deserialize;

use super::IdentityError;
use super::source::Candidate;

/// The authoritative name and version a content root declares for itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitDescriptor {
  pub name: String,
  #[serde(default)]
  pub version: Option<String>,
}

impl UnitDescriptor {
  pub fn parse(data: &[u8], origin: &Path) -> Result<Self, IdentityError> {
    let text = std::str::from_utf8(data).map_err(|source| IdentityError::DescriptorEncoding {
      path: origin.to_path_buf(),
      source,
    })?;
    let descriptor: UnitDescriptor = toml::from_str(text).map_err(|source| IdentityError::Descriptor {
      path: origin.to_path_buf(),
      source,
    })?;
    if descriptor.name.trim().is_empty() {
      return Err(IdentityError::EmptyName {
        path: origin.to_path_buf(),
      });
    }
    Ok(descriptor)
  }
}

/// Pick the variant to use: the highest version not exceeding `runtime_version`.
pub fn select_variant(mut candidates: Vec<Candidate>, runtime_version: u32) -> Option<Candidate> {
  candidates.sort_by(|a, b| b.version.cmp(&a.version));
  candidates.into_iter().find(|c| c.version <= runtime_version)
}
