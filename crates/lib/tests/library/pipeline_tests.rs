//! Resolution and transformation through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use bootlayer_lib::identity::Resolver;
use bootlayer_lib::layer::BootPolicy;
use bootlayer_lib::root::ContentRoot;
use bootlayer_lib::{Bootstrap, BootstrapConfig};
use serial_test::serial;

use super::common::{Recording, Workspace, canonical, descriptor};

fn names(units: &[bootlayer_lib::unit::ResolvedUnit]) -> Vec<Option<&str>> {
  units.iter().map(|unit| unit.name()).collect()
}

fn config(classpath: Vec<std::path::PathBuf>) -> BootstrapConfig {
  BootstrapConfig {
    classpath,
    ..BootstrapConfig::default()
  }
}

#[test]
fn exploded_directory_overrides_packaged_unit_end_to_end() {
  let ws = Workspace::new();
  let dir_a = ws.unit_dir("m/build/classes/java/main", "m", None);
  ws.services("m/build/classes/java/main", &["test.Recording"]);
  let archive_b = ws.archive("libs/m-2.0.jar", &[("unit.toml", descriptor("m", Some("2.0")).as_str())]);
  let archive_c = ws.archive("libs/core.jar", &[("unit.toml", descriptor("core", None).as_str())]);

  let calls = Rc::new(RefCell::new(Vec::new()));
  let recorded = Rc::clone(&calls);
  let mut bootstrap = Bootstrap::new(config(vec![dir_a.clone(), archive_b, archive_c.clone()]))
    .with_boot_policy(BootPolicy::new(["core"], ["core"]));
  bootstrap.register_entry_point("test.Recording", move || {
    Box::new(Recording {
      calls: Rc::clone(&recorded),
    })
  });

  let prepared = bootstrap.prepare().unwrap();
  assert!(prepared.changed);
  assert_eq!(names(&prepared.units), vec![Some("core"), Some("m")]);
  assert_eq!(prepared.units[0].roots, vec![ContentRoot::new(canonical(&archive_c))]);
  assert_eq!(prepared.units[1].roots, vec![ContentRoot::new(canonical(&dir_a))]);
  assert_eq!(prepared.units[1].version(), None);

  let context = bootstrap.enter(&prepared);
  let layers = bootstrap.build_layers(Rc::clone(&context), prepared.units.clone()).unwrap();
  assert_eq!(layers.boot.unit_names().collect::<Vec<_>>(), vec!["core"]);
  assert_eq!(layers.runtime.unit_names().collect::<Vec<_>>(), vec!["m"]);

  bootstrap
    .bootstrap_main(context, &["--flag".to_string()], prepared.units)
    .unwrap();
  assert_eq!(*calls.borrow(), vec![vec!["--flag".to_string()]]);
}

#[test]
fn multi_release_variant_follows_runtime_version() {
  let ws = Workspace::new();
  let mut entries = vec![("META-INF/MANIFEST.MF".to_string(), "Multi-Release: true\n".to_string())];
  entries.push(("unit.toml".to_string(), descriptor("v0", None)));
  for version in [9, 17, 21] {
    entries.push((
      format!("META-INF/versions/{version}/unit.toml"),
      descriptor(&format!("v{version}"), None),
    ));
  }
  let refs: Vec<(&str, &str)> = entries.iter().map(|(n, c)| (n.as_str(), c.as_str())).collect();
  let jar = ws.archive("multi.jar", &refs);
  let root = ContentRoot::canonical(&jar).unwrap();

  let at = |version| Resolver::new(version).resolve(&root).unwrap().name;

  assert_eq!(at(17).as_deref(), Some("v17"));
  assert_eq!(at(21).as_deref(), Some("v21"));
  assert_eq!(at(8).as_deref(), Some("v0"));
}

#[test]
fn file_name_fallback_cases() {
  let ws = Workspace::new();
  let resolver = Resolver::new(21);
  let identity = |file: &str| {
    let jar = ws.archive(file, &[("readme.txt", "no metadata")]);
    let identity = resolver
      .find_automatic(&[ContentRoot::canonical(&jar).unwrap()])
      .unwrap()
      .unwrap();
    (identity.name.unwrap(), identity.version)
  };

  assert_eq!(identity("foo-1.2.3.jar"), ("foo".to_string(), Some("1.2.3".to_string())));
  assert_eq!(identity("foo-bar.jar"), ("foo.bar".to_string(), None));
  assert_eq!(identity("__odd--name__.jar"), ("odd.name".to_string(), None));
}

#[test]
fn ignored_unit_is_absent_even_after_merge() {
  let ws = Workspace::new();
  let host = ws.file("host", "META-INF/forge-bootstrap-ignore", "# host handles it\nm\n");
  let classes = ws.unit_dir("m/build/classes/java/main", "m", None);
  let resources = ws.file("m/build/resources/main", "data.txt", "x");
  let jar = ws.archive("libs/m.jar", &[("unit.toml", descriptor("m", Some("1.0")).as_str())]);
  let other = ws.unit_dir("other", "other", None);

  let bootstrap = Bootstrap::new(config(vec![host, classes, resources, jar, other]));
  let prepared = bootstrap.prepare().unwrap();

  assert!(prepared.changed);
  assert!(prepared.units.iter().all(|unit| unit.name() != Some("m")));
  assert!(prepared.units.iter().any(|unit| unit.name() == Some("other")));
}

#[test]
fn explicit_override_list_merges_directories() {
  let ws = Workspace::new();
  let classes = ws.unit_dir("out/classes", "app", None);
  let resources = ws.file("out/resources", "app.txt", "x");
  let declaration = std::env::join_paths([
    format!("app%%{}", classes.display()),
    format!("app%%{}", resources.display()),
  ])
  .unwrap()
  .into_string()
  .unwrap();

  let bootstrap = Bootstrap::new(BootstrapConfig {
    unit_dirs: Some(declaration),
    ..config(vec![classes.clone(), resources.clone()])
  });
  let prepared = bootstrap.prepare().unwrap();

  assert_eq!(prepared.units.len(), 1);
  assert_eq!(prepared.units[0].name(), Some("app"));
  assert_eq!(
    prepared.units[0].roots,
    vec![
      ContentRoot::new(canonical(&classes)),
      ContentRoot::new(canonical(&resources))
    ]
  );
}

#[test]
fn repeated_preparation_is_stable() {
  let ws = Workspace::new();
  let dir = ws.unit_dir("a", "a", Some("1"));
  let jar = ws.archive("b-3.jar", &[("x.txt", "x")]);

  let bootstrap = Bootstrap::new(config(vec![dir, jar]));
  let first = bootstrap.prepare().unwrap();
  let second = bootstrap.prepare().unwrap();

  assert_eq!(first.units, second.units);
  assert_eq!(names(&first.units), vec![Some("a"), Some("b")]);
}

#[test]
#[serial]
fn configuration_from_environment_drives_discovery() {
  let ws = Workspace::new();
  let dir = ws.unit_dir("envunit", "env.unit", None);
  let missing = ws.path("missing.jar");
  let classpath = std::env::join_paths([&dir, &missing]).unwrap().into_string().unwrap();

  temp_env::with_vars(
    [
      ("BOOTLAYER_CLASSPATH", Some(classpath.as_str())),
      ("BOOTLAYER_DEV_AUTO", Some("false")),
      ("BOOTLAYER_RUNTIME_VERSION", None),
    ],
    || {
      let config = BootstrapConfig::from_env().unwrap();
      assert!(!config.dev_auto);

      let prepared = Bootstrap::new(config).prepare().unwrap();
      assert_eq!(prepared.raw.len(), 1);
      assert_eq!(names(&prepared.units), vec![Some("env.unit")]);
    },
  );
}
