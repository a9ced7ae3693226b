//! Run command implementation.
//!
//! Full startup: environment and flags, optional launcher shim, built-in
//! providers, then all three bootstrap phases.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use bootlayer_lib::{Bootstrap, BootstrapConfig};
use bootlayer_lib::shim::ShimManifest;

use super::ConfigArgs;
use crate::providers;

#[derive(Debug, Args)]
pub struct RunArgs {
  #[command(flatten)]
  pub config: ConfigArgs,

  /// Directory holding bootstrap-shim.list, bootstrap-shim.properties and libraries/
  #[arg(long, value_name = "DIR")]
  pub shim: Option<PathBuf>,

  /// Arguments handed to the entry point
  #[arg(last = true)]
  pub args: Vec<String>,
}

pub fn cmd_run(args: RunArgs, mut config: BootstrapConfig) -> Result<()> {
  let mut program_args = args.args;

  if let Some(dir) = &args.shim {
    let shim = ShimManifest::load(dir).with_context(|| format!("Failed to load launcher shim from {}", dir.display()))?;
    shim.apply(&mut config)?;
    program_args = shim.apply_arguments(program_args);
    debug!(libraries = shim.libraries.len(), "applied launcher shim");
  }

  let mut bootstrap = Bootstrap::new(config);
  providers::register(&mut bootstrap);

  bootstrap.start(&program_args).context("Bootstrap failed")?;
  Ok(())
}
