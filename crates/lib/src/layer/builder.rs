//! Two-stage layer construction: boot, then runtime.
//!
//! ```text
//! platform ◄── boot ◄── runtime
//!    ▲                    │
//!    └────────────────────┘
//! ```
//!
//! The boot layer takes the allow-listed bootstrap units. The runtime layer
//! takes everything the boot layer does not already provide by name.

use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::debug;

use super::{BOOT_LAYER, Layer, LayerError, RUNTIME_LAYER};
use crate::consts::{BOOT_UNITS, BOOTSTRAP_UNIT};
use crate::context::LoadContext;
use crate::unit::ResolvedUnit;

/// Which unit names belong in the boot layer, and which of them must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPolicy {
  units: BTreeSet<String>,
  required: BTreeSet<String>,
}

impl Default for BootPolicy {
  fn default() -> Self {
    Self::new(BOOT_UNITS.iter().copied(), [BOOTSTRAP_UNIT])
  }
}

impl BootPolicy {
  /// Required names are always part of the allow-list.
  pub fn new<U, R>(units: U, required: R) -> Self
  where
    U: IntoIterator,
    U::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
  {
    let required: BTreeSet<String> = required.into_iter().map(Into::into).collect();
    let mut units: BTreeSet<String> = units.into_iter().map(Into::into).collect();
    units.extend(required.iter().cloned());
    Self { units, required }
  }

  pub fn is_boot(&self, name: &str) -> bool {
    self.units.contains(name)
  }

  pub fn units(&self) -> impl Iterator<Item = &str> {
    self.units.iter().map(String::as_str)
  }

  pub fn required(&self) -> impl Iterator<Item = &str> {
    self.required.iter().map(String::as_str)
  }
}

/// Builder state before the boot layer exists.
#[derive(Debug)]
pub struct Boot {
  units: Vec<ResolvedUnit>,
}

/// Builder state once the boot layer is built.
#[derive(Debug)]
pub struct Runtime {
  boot: Rc<Layer>,
  units: Vec<ResolvedUnit>,
}

#[derive(Debug)]
pub struct LayerBuilder<S> {
  platform: Rc<Layer>,
  /// The context running the build; parent of both new contexts.
  context: Rc<LoadContext>,
  state: S,
}

/// The finished layer stack.
#[derive(Debug, Clone)]
pub struct Layers {
  pub platform: Rc<Layer>,
  pub boot: Rc<Layer>,
  pub runtime: Rc<Layer>,
}

impl LayerBuilder<Boot> {
  pub fn new(platform: Rc<Layer>, context: Rc<LoadContext>, units: Vec<ResolvedUnit>) -> Self {
    Self {
      platform,
      context,
      state: Boot { units },
    }
  }

  /// Place allow-listed units into the boot layer, parented on the platform.
  pub fn build_boot(self, policy: &BootPolicy) -> Result<LayerBuilder<Runtime>, LayerError> {
    let (boot_units, rest): (Vec<_>, Vec<_>) = self
      .state
      .units
      .into_iter()
      .partition(|unit| unit.name().is_some_and(|name| policy.is_boot(name)));

    if let Some(missing) = policy
      .required()
      .find(|name| !boot_units.iter().any(|unit| unit.name() == Some(*name)))
    {
      return Err(LayerError::MissingBootUnit {
        name: missing.to_string(),
      });
    }

    let groups = boot_units.iter().map(|unit| unit.roots.clone()).collect();
    let context = LoadContext::new(BOOT_LAYER, groups, vec![Rc::clone(&self.context)]);
    let boot = Layer::new(BOOT_LAYER, boot_units, vec![Rc::clone(&self.platform)], context)?;
    debug!(units = ?boot.unit_names().collect::<Vec<_>>(), "built boot layer");

    Ok(LayerBuilder {
      platform: self.platform,
      context: self.context,
      state: Runtime {
        boot: Rc::new(boot),
        units: rest,
      },
    })
  }
}

impl LayerBuilder<Runtime> {
  pub fn boot(&self) -> &Rc<Layer> {
    &self.state.boot
  }

  /// Place the remaining units into the runtime layer, parented on platform and boot.
  pub fn build_runtime(self) -> Result<Layers, LayerError> {
    let Runtime { boot, units } = self.state;

    let mut runtime_units = Vec::with_capacity(units.len());
    for unit in units {
      match unit.name() {
        Some(name) if boot.find_unit(name).is_some() => {
          debug!(unit = %name, roots = ?unit.roots, "bootstrap unit");
        }
        _ => {
          debug!(unit = %unit.display_name(), roots = ?unit.roots, "runtime unit");
          runtime_units.push(unit);
        }
      }
    }

    let groups = runtime_units.iter().map(|unit| unit.roots.clone()).collect();
    let context = LoadContext::new(
      RUNTIME_LAYER,
      groups,
      vec![Rc::clone(self.platform.context()), Rc::clone(&self.context)],
    );
    let runtime = Layer::new(
      RUNTIME_LAYER,
      runtime_units,
      vec![Rc::clone(&self.platform), Rc::clone(&boot)],
      context,
    )?;

    Ok(Layers {
      platform: self.platform,
      boot,
      runtime: Rc::new(runtime),
    })
  }
}
