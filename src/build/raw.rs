//! The unvalidated, serde-facing form of the build settings.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use super::{BuildConfig, PluginHandle, ValidationError};

/// Alias prefix that points at the application's source tree.
pub const SOURCE_ALIAS: &str = "@";

/// Where [`SOURCE_ALIAS`] points, relative to the project root.
pub const SOURCE_DIR: &str = "src";

/// Where the built app is deployed.
///
/// The two targets differ only in the public base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeployTarget {
    /// Served under `/search/`.
    #[default]
    Search,
    /// Served under `/Search-component/`, the project-page layout.
    SearchComponent,
}

impl DeployTarget {
    pub fn base_path(self) -> &'static str {
        match self {
            Self::Search => "/search/",
            Self::SearchComponent => "/Search-component/",
        }
    }
}

/// Build settings laid out the way the bundler groups them.
///
/// Missing fields take the compiled-in defaults, see [`RawBuildConfig::for_target`].
/// Unknown keys are rejected so a misspelt setting cannot fall back to its
/// default unnoticed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawBuildConfig {
    #[serde(deserialize_with = "scalar_as_string")]
    pub base: String,
    pub plugins: Vec<PluginHandle>,
    pub resolve: ResolveSection,
    pub build: OutputSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveSection {
    /// Relative targets stay relative until [`RawBuildConfig::resolve_aliases`].
    pub alias: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    #[serde(deserialize_with = "scalar_as_path")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Kept wide so out-of-range ports fail validation instead of parsing.
    pub port: i64,
    pub open: bool,
}

impl Default for RawBuildConfig {
    fn default() -> Self {
        Self::for_target(DeployTarget::default())
    }
}

impl Default for ResolveSection {
    fn default() -> Self {
        Self {
            alias: BTreeMap::from([(SOURCE_ALIAS.to_owned(), PathBuf::from(SOURCE_DIR))]),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dist"),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: 5173,
            open: true,
        }
    }
}

impl RawBuildConfig {
    /// The compiled-in settings for `target`.
    ///
    /// The `@` alias is relative here; see [`Self::resolve_aliases`].
    pub fn for_target(target: DeployTarget) -> Self {
        Self {
            base: target.base_path().to_owned(),
            plugins: vec![PluginHandle::new("vue")],
            resolve: ResolveSection::default(),
            build: OutputSection::default(),
            server: ServerSection::default(),
        }
    }

    /// Anchors every relative alias target at `root` and normalizes `.` and
    /// `..` segments.
    ///
    /// Empty targets are left alone so [`Self::validate`] can report them.
    #[must_use]
    pub fn resolve_aliases(mut self, root: &Path) -> Self {
        for target in self.resolve.alias.values_mut() {
            if !target.as_os_str().is_empty() {
                *target = normalize(&root.join(&*target));
            }
        }
        self
    }

    /// Checks every invariant and freezes the settings.
    ///
    /// Fields are checked in declaration order; the first violation wins.
    pub fn validate(self) -> Result<BuildConfig, ValidationError> {
        if self.base.is_empty() {
            return Err(ValidationError::EmptyBasePath);
        }
        if !(self.base.starts_with('/') && self.base.ends_with('/')) {
            return Err(ValidationError::BasePathNotDelimited(self.base));
        }

        if let Some(idx) = self.plugins.iter().position(|p| p.name().is_empty()) {
            return Err(ValidationError::EmptyPluginName(idx));
        }

        for (key, target) in &self.resolve.alias {
            if key.is_empty() {
                return Err(ValidationError::EmptyAliasKey);
            }
            if target.as_os_str().is_empty() {
                return Err(ValidationError::EmptyAliasTarget(key.clone()));
            }
            if !target.is_absolute() {
                return Err(ValidationError::RelativeAliasTarget(key.clone()));
            }
        }

        if self.build.out_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputDirectory);
        }

        let port = u16::try_from(self.server.port)
            .ok()
            .filter(|&port| port != 0)
            .ok_or(ValidationError::PortOutOfRange(self.server.port))?;

        Ok(BuildConfig {
            base_path: self.base,
            plugins: self.plugins,
            aliases: self.resolve.alias,
            output_directory: self.build.out_dir,
            server_port: port,
            auto_open: self.server.open,
        })
    }
}

/// Lexically folds `.` and `..` segments, like the bundler's path resolution.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Environment overrides arrive type-coerced, so `BUILD__BUILD__OUT_DIR=2024`
/// is an integer by the time it reaches a string field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Boolean(b) => b.to_string(),
    })
}

fn scalar_as_path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
    scalar_as_string(deserializer).map(PathBuf::from)
}
