use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::defaults::DefaultsSource;
use super::env::EnvSource;
use super::file::FileSource;
use super::resolve::resolve_references;
use super::source::{merge_at_path, ConfigSource};
use super::ConfigError;

/// Builder for layered configuration.
///
/// Sources are merged in registration order, later ones overriding earlier
/// ones. Nested tables merge recursively; other values (arrays included) are
/// replaced entirely.
///
/// ## Variable References
///
/// String values may reference other values with `${path.to.field}`:
///
/// ```toml
/// base = "/search/"
///
/// [server]
/// port = 5173
/// url = "http://localhost:${server.port}${base}"
/// ```
///
/// `$$` escapes a literal `$`.
///
/// ## Example
///
/// ```no_run
/// use search_buildcfg::Config;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Server {
///     port: u16,
///     open: bool,
/// }
///
/// let server: Server = Config::builder()
///     .with_file("server.toml", true)
///     .with_env("DEV", "__")
///     .build()?;
/// # Ok::<(), search_buildcfg::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Config {
    /// Creates an empty configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an arbitrary source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Adds `value`, serialized to a table, as a layer.
    ///
    /// Registered first, this gives every field a default that files and
    /// environment variables can override.
    pub fn with_defaults<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, ConfigError> {
        Ok(self.with_source(DefaultsSource::new(value)?))
    }

    /// Adds a TOML file.
    ///
    /// If `required` is `true`, the build fails when the file doesn't exist.
    /// Missing optional files are skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds environment variables starting with `prefix` followed by `separator`.
    ///
    /// The remainder of the variable name is split on `separator` and
    /// lowercased to form the config path. Values are coerced to boolean,
    /// integer, float, or string, in that order.
    ///
    /// ```no_run
    /// # use search_buildcfg::Config;
    /// # use serde::Deserialize;
    /// # #[derive(Deserialize)] struct Raw { }
    /// // With BUILD__SERVER__PORT=8080 this sets `server.port`.
    /// let raw: Raw = Config::builder()
    ///     .with_file("vite.toml", false)
    ///     .with_env("BUILD", "__")
    ///     .build()?;
    /// # Ok::<(), search_buildcfg::ConfigError>(())
    /// ```
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Merges every source, resolves references, and deserializes into `T`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let mut merged = toml::Table::new();

        for source in &self.sources {
            let entries = source.entries()?;
            tracing::debug!(
                source = %source.describe(),
                entries = entries.len(),
                "merging config source"
            );
            for entry in entries {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        resolve_references(&mut merged)?;

        toml::Value::Table(merged)
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Server {
        port: u16,
        open: bool,
        url: String,
    }

    fn defaults() -> Server {
        Server {
            port: 5173,
            open: true,
            url: "http://localhost:${port}/".into(),
        }
    }

    #[test]
    fn test_defaults_only() {
        let server: Server = Config::builder()
            .with_defaults(&defaults())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(server.port, 5173);
        assert_eq!(server.url, "http://localhost:5173/");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 3000").unwrap();

        let server: Server = Config::builder()
            .with_defaults(&defaults())
            .unwrap()
            .with_file(file.path(), true)
            .build()
            .unwrap();

        assert_eq!(server.port, 3000);
        assert!(server.open);
        assert_eq!(server.url, "http://localhost:3000/");
    }

    #[test]
    fn test_registration_order_decides_precedence() {
        std::env::set_var("BUILDER_ORDER_TEST__PORT", "9000");
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 3000").unwrap();

        let env_last: Server = Config::builder()
            .with_defaults(&defaults())
            .unwrap()
            .with_file(file.path(), true)
            .with_env("BUILDER_ORDER_TEST", "__")
            .build()
            .unwrap();
        let file_last: Server = Config::builder()
            .with_defaults(&defaults())
            .unwrap()
            .with_env("BUILDER_ORDER_TEST", "__")
            .with_file(file.path(), true)
            .build()
            .unwrap();

        assert_eq!(env_last.port, 9000);
        assert_eq!(file_last.port, 3000);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Config::builder()
            .with_file("/nonexistent/vite.toml", true)
            .build::<Server>();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_wrong_type_fails_deserialization() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let result = Config::builder()
            .with_defaults(&defaults())
            .unwrap()
            .with_file(file.path(), true)
            .build::<Server>();

        assert!(matches!(result, Err(ConfigError::DeserializeError(_))));
    }
}
