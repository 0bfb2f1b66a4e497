use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::raw::{OutputSection, RawBuildConfig, ResolveSection, ServerSection};
use super::PluginHandle;
use crate::ConfigError;

/// Validated build settings handed to the bundler.
///
/// Only [`RawBuildConfig::validate`] constructs one, so every value upholds:
///
/// - `base_path` starts and ends with `/`
/// - `output_directory` is non-empty
/// - `server_port` is in `1..=65535`
/// - alias prefixes and plugin names are non-empty
/// - alias targets are absolute paths
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub(super) base_path: String,
    pub(super) plugins: Vec<PluginHandle>,
    pub(super) aliases: BTreeMap<String, PathBuf>,
    pub(super) output_directory: PathBuf,
    pub(super) server_port: u16,
    pub(super) auto_open: bool,
}

impl BuildConfig {
    /// Public path prefix the built assets are served under.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Plugins in the order the bundler should apply them.
    pub fn plugins(&self) -> &[PluginHandle] {
        &self.plugins
    }

    pub fn aliases(&self) -> &BTreeMap<String, PathBuf> {
        &self.aliases
    }

    /// Resolved path for an alias prefix such as `@`.
    pub fn alias(&self, prefix: &str) -> Option<&Path> {
        self.aliases.get(prefix).map(PathBuf::as_path)
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    /// Whether the dev server should open a browser on start.
    pub fn auto_open(&self) -> bool {
        self.auto_open
    }

    /// Converts back to the bundler's section layout.
    pub fn to_raw(&self) -> RawBuildConfig {
        RawBuildConfig {
            base: self.base_path.clone(),
            plugins: self.plugins.clone(),
            resolve: ResolveSection {
                alias: self.aliases.clone(),
            },
            build: OutputSection {
                out_dir: self.output_directory.clone(),
            },
            server: ServerSection {
                port: i64::from(self.server_port),
                open: self.auto_open,
            },
        }
    }

    /// Renders the settings as a TOML document in the bundler's layout.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(&self.to_raw())?)
    }
}
