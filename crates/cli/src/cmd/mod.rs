mod inspect;
mod run;

pub use inspect::{InspectArgs, cmd_inspect};
pub use run::{RunArgs, cmd_run};

use anyhow::{Context, Result};
use clap::Args;

use bootlayer_lib::BootstrapConfig;
use bootlayer_lib::config::{ENV_CLASSPATH, ENV_RUNTIME_VERSION, split_classpath};

/// Settings shared by every command that resolves a classpath.
#[derive(Debug, Args)]
pub struct ConfigArgs {
  /// Classpath entries, separated like PATH
  #[arg(long, env = ENV_CLASSPATH, hide_env_values = true)]
  pub classpath: Option<String>,

  /// Running feature version
  #[arg(long, value_name = "N", env = ENV_RUNTIME_VERSION)]
  pub runtime_version: Option<u32>,
}

impl ConfigArgs {
  /// Environment configuration with command-line values applied on top.
  pub fn load(&self, debug: bool) -> Result<BootstrapConfig> {
    let mut config = BootstrapConfig::from_env().context("Invalid bootstrap environment")?;
    if let Some(classpath) = self.classpath.as_deref() {
      config.classpath = split_classpath(classpath);
    }
    if let Some(version) = self.runtime_version {
      config.runtime_version = version;
    }
    config.debug |= debug;
    Ok(config)
  }
}
