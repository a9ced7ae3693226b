//! Inspect command implementation.
//!
//! Runs discovery, the transformer pipeline and the layer build without
//! launching anything, then reports where every unit ended up.

use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use bootlayer_lib::{Bootstrap, BootstrapConfig};
use bootlayer_lib::layer::LayerSummary;
use bootlayer_lib::root::ContentRoot;
use bootlayer_lib::unit::ResolvedUnit;

use super::ConfigArgs;
use crate::output::{self, OutputFormat, format_unit, print_info, print_json, print_stat, print_success, print_warning};

#[derive(Debug, Args)]
pub struct InspectArgs {
  #[command(flatten)]
  pub config: ConfigArgs,

  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct InspectReport {
  context: String,
  changed: bool,
  entries: Vec<ContentRoot>,
  units: Vec<ResolvedUnit>,
  layers: Vec<LayerSummary>,
}

pub fn cmd_inspect(args: InspectArgs, config: BootstrapConfig) -> Result<()> {
  let bootstrap = Bootstrap::new(config);

  let prepared = bootstrap.prepare().context("Failed to resolve classpath")?;
  let context = bootstrap.enter(&prepared);
  let layers = bootstrap
    .build_layers(Rc::clone(&context), prepared.units.clone())
    .context("Failed to build layers")?;

  let report = InspectReport {
    context: context.name().to_string(),
    changed: prepared.changed,
    entries: prepared.raw,
    units: prepared.units,
    layers: vec![layers.boot.summary(), layers.runtime.summary()],
  };

  if args.format.is_json() {
    return print_json(&report);
  }

  print_report(&report);
  Ok(())
}

fn print_report(report: &InspectReport) {
  print_success(&format!(
    "Resolved {} unit(s) from {} classpath entries",
    report.units.len(),
    report.entries.len()
  ));
  print_stat("Context", &report.context);
  print_stat("Changed", if report.changed { "yes" } else { "no" });

  for layer in &report.layers {
    println!();
    print_info(&format!("{} (parents: {})", layer.name, layer.parents.join(", ")));
    if layer.units.is_empty() && layer.anonymous.is_empty() {
      println!("  (empty)");
    }
    for unit in layer.units.iter().chain(&layer.anonymous) {
      println!("  {} {}", output::symbols::ARROW, format_unit(unit));
      for root in &unit.roots {
        println!("      {}", root);
      }
    }
  }

  let unnamed = report.units.iter().filter(|unit| unit.name().is_none()).count();
  if unnamed > 0 {
    println!();
    print_warning(&format!("{} unnamed unit(s) loaded anonymously", unnamed));
  }
}
