//! File-name based unit naming for archives that declare nothing.
//!
//! `foo-bar-1.2.3.jar` becomes `foo.bar` at version `1.2.3`. The version
//! fragment starts at the first `-<digits>` boundary and must satisfy the
//! semantic version grammar; otherwise it stays part of the name.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::UnitIdentity;
use crate::consts::ARCHIVE_EXTENSIONS;

static DASH_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-(\d+(\.|$))").expect("valid pattern"));
static NON_ALPHANUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid pattern"));

/// Derive an identity from an archive's file name.
///
/// Returns `None` for files without an archive extension, and for names that
/// clean up to nothing.
pub fn from_file_name(path: &Path) -> Option<UnitIdentity> {
  let file_name = path.file_name()?.to_str()?;
  let (stem, extension) = file_name.rsplit_once('.')?;
  if !ARCHIVE_EXTENSIONS.iter().any(|ext| ext.eq_ignore_ascii_case(extension)) {
    return None;
  }

  let (name, version) = split_version(stem);
  let name = clean_unit_name(name);
  if name.is_empty() {
    return None;
  }

  Some(UnitIdentity {
    name: Some(name),
    version: version.map(str::to_string),
    layer: None,
  })
}

fn split_version(stem: &str) -> (&str, Option<&str>) {
  if let Some(found) = DASH_VERSION.find(stem) {
    let tail = &stem[found.start() + 1..];
    if is_valid_version(tail) {
      return (&stem[..found.start()], Some(tail));
    }
  }
  (stem, None)
}

/// `MAJOR[.MINOR[.PATCH]][-PRE][+BUILD]`
fn is_valid_version(text: &str) -> bool {
  let split = text.find(['-', '+']).unwrap_or(text.len());
  let (core, suffix) = text.split_at(split);

  let parts: Vec<&str> = core.split('.').collect();
  if parts.len() > 3 {
    return false;
  }

  let mut padded = core.to_string();
  for _ in parts.len()..3 {
    padded.push_str(".0");
  }
  padded.push_str(suffix);

  semver::Version::parse(&padded).is_ok()
}

/// Replace runs of non-alphanumerics with a single `.` and trim edge dots.
pub fn clean_unit_name(raw: &str) -> String {
  NON_ALPHANUM.replace_all(raw, ".").trim_matches('.').to_string()
}
