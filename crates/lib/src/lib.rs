//! bootlayer-lib: Resolution and layering for the bootlayer launcher
//!
//! This crate turns an unordered list of content roots (directories and
//! archives) into isolated loading layers and launches the single entry point
//! found in the innermost one:
//! - `identity`: unit name/version extraction from descriptors, manifests and file names
//! - `transform`: classpath transformers (development merge, ignore lists)
//! - `context`: isolated resource lookup scopes
//! - `layer`: the two-stage boot/runtime layer builder
//! - `launch`: entry-point discovery and invocation
//! - `bootstrap`: the phased startup that ties everything together

pub mod bootstrap;
pub mod config;
pub mod consts;
pub mod context;
pub mod error;
pub mod identity;
pub mod launch;
pub mod layer;
pub mod registry;
pub mod root;
pub mod shim;
pub mod transform;
pub mod unit;
pub mod util;

pub use bootstrap::{Bootstrap, Prepared};
pub use config::BootstrapConfig;
pub use error::BootstrapError;

/// Result type for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;
