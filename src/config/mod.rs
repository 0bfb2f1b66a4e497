//! Layered configuration loading.

mod builder;
mod defaults;
mod env;
mod error;
mod file;
mod resolve;
mod source;

pub use builder::Config;
pub use defaults::DefaultsSource;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{ConfigEntry, ConfigSource};
