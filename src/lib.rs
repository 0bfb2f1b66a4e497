pub mod build;
pub mod config;
mod error;

pub use build::{
    load, load_for, load_layered, BuildConfig, DeployTarget, PluginHandle, ValidationError,
};
pub use config::{Config, ConfigError};
pub use error::Error;
