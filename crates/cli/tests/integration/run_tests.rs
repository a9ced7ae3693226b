//! Run command integration tests.

use predicates::prelude::*;

use super::common::{ECHO, TestEnv, classpath};

#[test]
fn run_launches_echo_with_arguments() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[ECHO]);

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core])])
    .args(["--", "hello", "world"])
    .assert()
    .success()
    .stdout("hello\nworld\n");
}

#[test]
fn run_reads_classpath_from_environment() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[ECHO]);

  env
    .bootlayer_cmd()
    .env("BOOTLAYER_CLASSPATH", classpath(&[core]))
    .args(["run", "--", "from-env"])
    .assert()
    .success()
    .stdout("from-env\n");
}

#[test]
fn run_finds_provider_declared_by_runtime_unit() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[]);
  let app = env.archive(
    "libs/app-2.0.jar",
    &[("META-INF/services/bootlayer.EntryPoint", "# launcher\nbootlayer.cli.Echo\n")],
  );

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core, app])])
    .args(["--", "packaged"])
    .assert()
    .success()
    .stdout("packaged\n");
}

#[test]
fn run_without_entry_point_fails() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[]);

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core])])
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not find any bootlayer.EntryPoint providers"));
}

#[test]
fn run_with_unregistered_provider_fails() {
  let env = TestEnv::new();
  let core = env.launcher("core", &["com.example.Missing"]);

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core])])
    .assert()
    .failure()
    .stderr(predicate::str::contains("'com.example.Missing' is declared but not registered"));
}

#[test]
fn run_applies_shim_libraries_and_arguments() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[]);
  env.archive(
    "shim/libraries/com/example/app-1.0.jar",
    &[
      ("unit.toml", "name = \"app\"\nversion = \"1.0\"\n"),
      ("META-INF/services/bootlayer.EntryPoint", ECHO),
    ],
  );
  let shim = env.shim(
    "shim",
    &["com/example/app-1.0.jar"],
    "Runtime-Version=17\nArguments=--from-shim\n",
  );

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core])])
    .arg("--shim")
    .arg(&shim)
    .args(["--", "extra"])
    .assert()
    .success()
    .stdout("--from-shim\nextra\n");
}

#[test]
fn run_with_shim_requiring_newer_runtime_fails() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[ECHO]);
  let shim = env.shim("shim", &[], "Runtime-Version=25\n");

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core])])
    .arg("--shim")
    .arg(&shim)
    .args(["--runtime-version", "21"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("at least 25 is required"));
}

#[test]
fn run_with_shim_missing_library_fails() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[ECHO]);
  let shim = env.shim("shim", &["gone.jar"], "");

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &classpath(&[core])])
    .arg("--shim")
    .arg(&shim)
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing 1 required libraries"));
}

#[test]
fn debug_flag_enables_classpath_dump() {
  let env = TestEnv::new();
  let core = env.launcher("core", &[ECHO]);
  let cp = classpath(&[core]);

  env
    .bootlayer_cmd()
    .args(["--debug", "run", "--classpath", &cp])
    .assert()
    .success()
    .stderr(predicate::str::contains("classpath entry"));

  env
    .bootlayer_cmd()
    .env("BOOTLAYER_DEBUG", "TRUE")
    .args(["run", "--classpath", &cp])
    .assert()
    .success()
    .stderr(predicate::str::contains("classpath entry"));

  env
    .bootlayer_cmd()
    .args(["run", "--classpath", &cp])
    .assert()
    .success()
    .stderr(predicate::str::contains("classpath entry").not());
}
