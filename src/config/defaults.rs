use serde::Serialize;
use toml::{Table, Value};

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// A source holding an in-memory value, typically compiled-in defaults.
///
/// The value is serialized once, when the source is created.
#[derive(Debug, Clone)]
pub struct DefaultsSource {
    table: Table,
}

impl DefaultsSource {
    /// Serializes `value` into a root table.
    ///
    /// Fails with [`ConfigError::SerializeError`] if `value` does not
    /// serialize to a TOML table.
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self, ConfigError> {
        match Value::try_from(value)? {
            Value::Table(table) => Ok(Self { table }),
            other => Err(ConfigError::NotATable(other.type_str())),
        }
    }
}

impl ConfigSource for DefaultsSource {
    fn describe(&self) -> String {
        "defaults".to_owned()
    }

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        Ok(vec![ConfigEntry::root(self.table.clone())])
    }
}
