//! Well-known names, paths and defaults.

/// Metadata directory present in every content root.
pub const META_INF: &str = "META-INF";
pub const MANIFEST: &str = "MANIFEST.MF";
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const VERSIONS: &str = "versions";
pub const VERSION_DIR: &str = "META-INF/versions/";
pub const SERVICES_DIR: &str = "META-INF/services/";

/// Unit descriptor file, at the root or under `META-INF/versions/<N>/`.
pub const DESCRIPTOR: &str = "unit.toml";

/// Marker listing unit names a host environment wants excluded.
pub const IGNORE_FILE: &str = "META-INF/forge-bootstrap-ignore";

// Manifest main attributes
pub const AUTOMATIC_UNIT_NAME: &str = "Automatic-Module-Name";
pub const MULTI_RELEASE: &str = "Multi-Release";
pub const UNIT_LAYER: &str = "Forge-Module-Layer";

/// The only layer hint value that changes behavior.
pub const BOOT_LAYER_HINT: &str = "boot";

/// Capability implemented by launchable providers.
pub const ENTRY_POINT: &str = "bootlayer.EntryPoint";

/// Feature version of the running launcher, used for descriptor variant selection.
pub const FEATURE_VERSION: u32 = 21;

/// The launcher's own unit. Layer construction cannot proceed without it.
pub const BOOTSTRAP_UNIT: &str = "bootlayer";

/// Units that always load in the boot layer.
pub const BOOT_UNITS: &[&str] = &[BOOTSTRAP_UNIT, "bootlayer.api"];

/// Group id for explicit override entries that do not name one.
pub const DEFAULT_GROUP_ID: &str = "default";

/// File extensions eligible for file-name based unit naming.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip"];

// Launcher shim resources
pub const SHIM_LIST: &str = "bootstrap-shim.list";
pub const SHIM_PROPERTIES: &str = "bootstrap-shim.properties";
pub const SHIM_LIBRARIES: &str = "libraries";
