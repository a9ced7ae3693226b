mod cmd;
mod output;
mod providers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{ConfigArgs, InspectArgs, RunArgs, cmd_inspect, cmd_run};

/// bootlayer - layered launcher for unit-based applications
#[derive(Parser)]
#[command(name = "bootlayer")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (also BOOTLAYER_DEBUG=true)
  #[arg(short, long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve the classpath, build the layers and launch the entry point
  Run(RunArgs),

  /// Resolve the classpath and show the resulting units and layers
  Inspect(InspectArgs),
}

impl Commands {
  fn config_args(&self) -> &ConfigArgs {
    match self {
      Commands::Run(args) => &args.config,
      Commands::Inspect(args) => &args.config,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  let config = cli.command.config_args().load(cli.debug)?;
  init_logging(config.debug);

  match cli.command {
    Commands::Run(args) => cmd_run(args, config),
    Commands::Inspect(args) => cmd_inspect(args, config),
  }
}

fn init_logging(debug: bool) {
  let level = if debug { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
