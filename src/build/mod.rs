//! Build settings for the search front end and the loader that produces them.
//!
//! The bundler consumes a [`BuildConfig`]; this module only constructs and
//! validates it. Plugins are passed through as opaque [`PluginHandle`]s.

mod error;
mod loader;
mod model;
mod plugin;
mod raw;

pub use error::ValidationError;
pub use loader::{load, load_for, load_layered, DEFAULT_ENV_PREFIX};
pub use model::BuildConfig;
pub use plugin::PluginHandle;
pub use raw::{
    DeployTarget, OutputSection, RawBuildConfig, ResolveSection, ServerSection, SOURCE_ALIAS,
    SOURCE_DIR,
};
