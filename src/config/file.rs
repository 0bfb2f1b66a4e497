//! File-based configuration source.

use std::path::{Path, PathBuf};

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// A configuration source backed by a TOML file.
///
/// A required file that is missing fails the load; an optional one is skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        format!("file '{}'", self.path.display())
    }

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.required => {
                tracing::debug!(path = %self.path.display(), "optional config file absent, skipping");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let table = toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: self.path.clone(),
            source,
        })?;
        Ok(vec![ConfigEntry::root(table)])
    }
}
