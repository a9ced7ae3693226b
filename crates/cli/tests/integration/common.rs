//! Shared test helpers for CLI integration tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const ECHO: &str = "bootlayer.cli.Echo";
pub const SERVICES: &str = "META-INF/services/bootlayer.EntryPoint";

const BOOTLAYER_VARS: [&str; 7] = [
  "BOOTLAYER_CLASSPATH",
  "BOOTLAYER_DEBUG",
  "BOOTLAYER_DEV_AUTO",
  "BOOTLAYER_DEV_EXPLICIT",
  "BOOTLAYER_DEV_IGNORE",
  "BOOTLAYER_UNIT_DIRS",
  "BOOTLAYER_RUNTIME_VERSION",
];

/// Isolated test environment.
///
/// Each test gets its own temporary directory to lay out content roots in.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  /// Directory root `dir` carrying a `unit.toml` descriptor.
  pub fn unit_dir(&self, dir: &str, name: &str, version: Option<&str>) -> PathBuf {
    self.write_file(&format!("{dir}/unit.toml"), &descriptor(name, version));
    self.path(dir)
  }

  /// The launcher's own unit, declaring `providers` as entry points.
  pub fn launcher(&self, dir: &str, providers: &[&str]) -> PathBuf {
    let root = self.unit_dir(dir, "bootlayer", Some("1.0.0"));
    if !providers.is_empty() {
      self.write_file(&format!("{dir}/{SERVICES}"), &providers.join("\n"));
    }
    root
  }

  /// Zip archive at `relative_path` holding `entries`.
  pub fn archive(&self, relative_path: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (name, contents) in entries {
      writer.start_file(*name, SimpleFileOptions::default()).unwrap();
      writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
  }

  /// Launcher shim directory listing `libraries` (relative to its `libraries/` folder).
  pub fn shim(&self, dir: &str, libraries: &[&str], properties: &str) -> PathBuf {
    let list: Vec<String> = libraries
      .iter()
      .enumerate()
      .map(|(i, lib)| format!("{:064x}\tlib{}\t{}", i, i, lib))
      .collect();
    self.write_file(&format!("{dir}/bootstrap-shim.list"), &list.join("\n"));
    self.write_file(&format!("{dir}/bootstrap-shim.properties"), properties);
    self.path(dir)
  }

  /// Command for the bootlayer binary, isolated from the caller's `BOOTLAYER_*` and `RUST_LOG` variables.
  pub fn bootlayer_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("bootlayer");
    for var in BOOTLAYER_VARS {
      cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(self.temp.path());
    cmd
  }
}

pub fn descriptor(name: &str, version: Option<&str>) -> String {
  match version {
    Some(version) => format!("name = \"{name}\"\nversion = \"{version}\"\n"),
    None => format!("name = \"{name}\"\n"),
  }
}

/// `PATH`-style classpath string.
pub fn classpath<P: AsRef<Path>>(entries: &[P]) -> String {
  std::env::join_paths(entries.iter().map(|p| p.as_ref()))
    .unwrap()
    .into_string()
    .unwrap()
}
