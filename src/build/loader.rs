use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::raw::{DeployTarget, RawBuildConfig};
use super::{BuildConfig, ValidationError};
use crate::{Config, Error};

/// Environment prefix read by [`load_layered`], as in `BUILD__SERVER__PORT`.
pub const DEFAULT_ENV_PREFIX: &str = "BUILD";

const ENV_SEPARATOR: &str = "__";

/// Builds the compiled-in settings for the default deployment target.
///
/// Relative alias targets are anchored at the working directory, so calls
/// return equal values as long as the process does not change directory.
pub fn load() -> Result<BuildConfig, ValidationError> {
    load_for(DeployTarget::default())
}

/// Builds the compiled-in settings for `target`.
pub fn load_for(target: DeployTarget) -> Result<BuildConfig, ValidationError> {
    RawBuildConfig::for_target(target)
        .resolve_aliases(&working_dir())
        .validate()
        .inspect_err(|e| warn!(?target, error = %e, "invalid build settings"))
}

/// Layers the compiled-in settings for `target`, the TOML file at `path` (if
/// present) and `<env_prefix>__*` environment variables, then validates.
///
/// Later layers win. String values may use `${section.field}` references.
/// Relative alias targets are anchored at the directory holding `path`, or at
/// the working directory when the file does not exist.
///
/// # Errors
///
/// [`Error::Config`] if a layer cannot be read or deserialized,
/// [`Error::Validation`] if the merged settings break an invariant.
pub fn load_layered(
    target: DeployTarget,
    path: impl AsRef<Path>,
    env_prefix: &str,
) -> Result<BuildConfig, Error> {
    let path = path.as_ref();
    info!(?target, path = %path.display(), env_prefix, "loading build settings");

    let raw: RawBuildConfig = Config::builder()
        .with_defaults(&RawBuildConfig::for_target(target))?
        .with_file(path, false)
        .with_env(env_prefix, ENV_SEPARATOR)
        .build()?;

    let config = raw
        .resolve_aliases(&alias_root(path))
        .validate()
        .inspect_err(|e| warn!(error = %e, "invalid build settings"))?;

    info!(
        base_path = config.base_path(),
        port = config.server_port(),
        "build settings loaded"
    );
    Ok(config)
}

/// An unreadable working directory leaves relative aliases unanchored, which
/// validation then rejects.
fn working_dir() -> PathBuf {
    std::env::current_dir()
        .inspect_err(|e| warn!(error = %e, "cannot read working directory"))
        .unwrap_or_default()
}

fn alias_root(config_file: &Path) -> PathBuf {
    let cwd = working_dir();
    match config_file.parent() {
        Some(dir) if config_file.is_file() => cwd.join(dir),
        _ => cwd,
    }
}
