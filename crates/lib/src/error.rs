//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::context::ContextError;
use crate::identity::IdentityError;
use crate::launch::LaunchError;
use crate::layer::LayerError;
use crate::root::RootError;
use crate::shim::ShimError;
use crate::transform::TransformError;

/// Any fatal startup condition.
#[derive(Debug, Error)]
pub enum BootstrapError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Root(#[from] RootError),

  #[error(transparent)]
  Identity(#[from] IdentityError),

  #[error(transparent)]
  Transform(#[from] TransformError),

  #[error(transparent)]
  Context(#[from] ContextError),

  #[error(transparent)]
  Layer(#[from] LayerError),

  #[error(transparent)]
  Launch(#[from] LaunchError),

  #[error(transparent)]
  Shim(#[from] ShimError),
}
