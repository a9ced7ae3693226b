//! Shared fixtures for library integration tests.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bootlayer_lib::consts::{ENTRY_POINT, SERVICES_DIR};
use bootlayer_lib::launch::EntryPoint;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A workspace directory that content roots are laid out in.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Write a file under `root` (relative to the workspace) and return `root`'s path.
  pub fn file(&self, root: &str, relative: &str, contents: &str) -> PathBuf {
    let dir = self.path(root);
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    dir
  }

  /// A directory root carrying a `unit.toml`.
  pub fn unit_dir(&self, root: &str, name: &str, version: Option<&str>) -> PathBuf {
    self.file(root, "unit.toml", &descriptor(name, version))
  }

  /// Declare entry-point providers in a directory root.
  pub fn services(&self, root: &str, ids: &[&str]) -> PathBuf {
    self.file(root, &format!("{SERVICES_DIR}{ENTRY_POINT}"), &ids.join("\n"))
  }

  /// A zip archive with the given entries.
  pub fn archive(&self, relative: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = self.path(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (name, contents) in entries {
      writer.start_file(*name, SimpleFileOptions::default()).unwrap();
      writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
  }
}

pub fn descriptor(name: &str, version: Option<&str>) -> String {
  match version {
    Some(version) => format!("name = \"{name}\"\nversion = \"{version}\"\n"),
    None => format!("name = \"{name}\"\n"),
  }
}

pub fn canonical(path: &Path) -> PathBuf {
  dunce::canonicalize(path).unwrap()
}

/// Entry point that records the arguments it was started with.
pub struct Recording {
  pub calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl EntryPoint for Recording {
  fn name(&self) -> String {
    "recording".to_string()
  }

  fn main(&self, args: &[String]) -> anyhow::Result<()> {
    self.calls.borrow_mut().push(args.to_vec());
    Ok(())
  }
}
