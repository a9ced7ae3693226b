//! Test fixtures for bootlayer-lib.
//!
//! Helpers that lay out content roots on disk: plain files, unit descriptors,
//! manifests and zip archives.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, contents).unwrap();
  path
}

/// Render a `unit.toml` body.
pub fn descriptor(name: &str, version: Option<&str>) -> String {
  match version {
    Some(version) => format!("name = \"{name}\"\nversion = \"{version}\"\n"),
    None => format!("name = \"{name}\"\n"),
  }
}

/// Render a manifest main section from attribute pairs.
pub fn manifest(attributes: &[(&str, &str)]) -> String {
  let mut out = String::from("Manifest-Version: 1.0\n");
  for (key, value) in attributes {
    out.push_str(&format!("{key}: {value}\n"));
  }
  out
}

/// Write a root-level `unit.toml` into a directory root.
pub fn write_descriptor(root: &Path, name: &str, version: Option<&str>) -> PathBuf {
  write_file(root, "unit.toml", &descriptor(name, version))
}

/// Write `META-INF/MANIFEST.MF` into a directory root.
pub fn write_manifest(root: &Path, attributes: &[(&str, &str)]) -> PathBuf {
  write_file(root, "META-INF/MANIFEST.MF", &manifest(attributes))
}

/// Create a zip archive at `path` holding the given `(entry, contents)` pairs.
pub fn write_archive(path: &Path, entries: &[(&str, &str)]) -> PathBuf {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  let mut writer = ZipWriter::new(File::create(path).unwrap());
  let options = SimpleFileOptions::default();
  for (name, contents) in entries {
    writer.start_file(*name, options).unwrap();
    writer.write_all(contents.as_bytes()).unwrap();
  }
  writer.finish().unwrap();
  path.to_path_buf()
}
