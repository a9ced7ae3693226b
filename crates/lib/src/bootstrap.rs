//! Phased startup.
//!
//! 1. [`Bootstrap::prepare`]: discover content roots, run the transformer
//!    pipeline, resolve units. Pure data, no contexts.
//! 2. [`Bootstrap::enter`]: pick the context phase 3 runs in. A changed
//!    classpath gets a fresh isolated context built from the rewritten roots.
//! 3. [`Bootstrap::bootstrap_main`]: build the boot and runtime layers and
//!    launch the entry point. Never reruns the pipeline.

use std::rc::Rc;

use tracing::{debug, info};

use crate::Result;
use crate::config::BootstrapConfig;
use crate::context::LoadContext;
use crate::identity::Resolver;
use crate::launch::{EntryPoint, EntryPoints, launch};
use crate::layer::{BootPolicy, Layer, LayerBuilder, Layers};
use crate::root::{ContentRoot, find_classpath_entries};
use crate::transform::{Pipeline, WorkingSet};
use crate::unit::{ResolvedUnit, resolve_units};

/// Context used when the pipeline left the classpath alone.
pub const APP_CONTEXT: &str = "app";
/// Context rebuilt from a classpath the pipeline rewrote.
pub const CLEANED_CONTEXT: &str = "cleaned-bootstrap";

/// Output of phase 1.
#[derive(Debug, Clone)]
pub struct Prepared {
  /// Discovered classpath entries, before any transformer ran.
  pub raw: Vec<ContentRoot>,
  /// Resolved units of the transformed working set, in order.
  pub units: Vec<ResolvedUnit>,
  /// Whether any transformer changed the working set.
  pub changed: bool,
}

pub struct Bootstrap {
  config: BootstrapConfig,
  pipeline: Pipeline,
  entry_points: EntryPoints,
  policy: BootPolicy,
  resolver: Resolver,
  platform: Rc<Layer>,
}

impl Bootstrap {
  /// Default pipeline and boot policy for `config`, with no entry points registered.
  pub fn new(config: BootstrapConfig) -> Self {
    Self {
      pipeline: Pipeline::with_defaults(&config),
      entry_points: EntryPoints::new(),
      policy: BootPolicy::default(),
      resolver: Resolver::new(config.runtime_version),
      platform: Layer::platform(LoadContext::platform()),
      config,
    }
  }

  pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
    self.pipeline = pipeline;
    self
  }

  pub fn with_boot_policy(mut self, policy: BootPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn register_entry_point<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
  where
    F: Fn() -> Box<dyn EntryPoint> + 'static,
  {
    self.entry_points.register(id, factory);
    self
  }

  pub fn entry_points(&self) -> &EntryPoints {
    &self.entry_points
  }

  pub fn config(&self) -> &BootstrapConfig {
    &self.config
  }

  pub fn resolver(&self) -> &Resolver {
    &self.resolver
  }

  pub fn platform(&self) -> &Rc<Layer> {
    &self.platform
  }

  /// Phase 1: discover, transform and resolve.
  pub fn prepare(&self) -> Result<Prepared> {
    let raw = find_classpath_entries(&self.config.classpath)?;
    for root in &raw {
      debug!(root = %root, "classpath entry");
    }

    let mut set = WorkingSet::from_roots(raw.clone());
    let changed = self.pipeline.run(&mut set, &self.resolver)?;
    let units = resolve_units(&set, &self.resolver)?;

    info!(entries = raw.len(), units = units.len(), changed, "resolved classpath");
    Ok(Prepared { raw, units, changed })
  }

  /// Phase 2: the context phase 3 runs in.
  pub fn enter(&self, prepared: &Prepared) -> Rc<LoadContext> {
    let platform = self.platform.context();
    if !prepared.changed {
      let groups = prepared.raw.iter().map(|root| vec![root.clone()]).collect();
      return LoadContext::new(APP_CONTEXT, groups, vec![Rc::clone(platform)]);
    }

    debug!("transformers modified the classpath, building a new context");
    for unit in &prepared.units {
      debug!(unit = %unit.display_name(), roots = ?unit.roots, "context entry");
    }
    LoadContext::isolated(CLEANED_CONTEXT, &prepared.units, platform)
  }

  /// Build the boot and runtime layers inside `context`.
  pub fn build_layers(&self, context: Rc<LoadContext>, units: Vec<ResolvedUnit>) -> Result<Layers> {
    let layers = LayerBuilder::new(Rc::clone(&self.platform), context, units)
      .build_boot(&self.policy)?
      .build_runtime()?;
    Ok(layers)
  }

  /// Phase 3: build layers, then launch the single entry point.
  pub fn bootstrap_main(&self, context: Rc<LoadContext>, args: &[String], units: Vec<ResolvedUnit>) -> Result<()> {
    info!(context = context.name(), "building layers");
    let layers = self.build_layers(context, units)?;
    launch(&layers.runtime, &self.entry_points, args)?;
    Ok(())
  }

  /// Run all three phases.
  pub fn start(&self, args: &[String]) -> Result<()> {
    let prepared = self.prepare()?;
    let context = self.enter(&prepared);
    self.bootstrap_main(context, args, prepared.units)
  }
}

impl std::fmt::Debug for Bootstrap {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Bootstrap")
      .field("config", &self.config)
      .field("pipeline", &self.pipeline)
      .field("entry_points", &self.entry_points)
      .field("policy", &self.policy)
      .finish()
  }
}
