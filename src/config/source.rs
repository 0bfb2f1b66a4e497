//! The source abstraction shared by every configuration layer.

use toml::{Table, Value};

use super::ConfigError;

/// A value contributed by a source, anchored at a dotted path.
///
/// An empty `path` means the value is a table merged at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub path: Vec<String>,
    pub value: Value,
}

impl ConfigEntry {
    pub fn root(table: Table) -> Self {
        Self {
            path: Vec::new(),
            value: Value::Table(table),
        }
    }

    pub fn at_path(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }
}

/// One layer of the loading pipeline.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Short label used in log output.
    fn describe(&self) -> String;

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// Merges `value` into `table` at `path`, creating intermediate tables.
///
/// Tables merge recursively; everything else replaces what was there.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    if rest.is_empty() {
        match (table.get_mut(first), value) {
            (Some(Value::Table(base)), Value::Table(overlay)) => deep_merge(base, overlay),
            (_, value) => {
                table.insert(first.clone(), value);
            }
        }
        return;
    }

    let nested = table
        .entry(first.clone())
        .or_insert(Value::Table(Table::new()));
    if !nested.is_table() {
        *nested = Value::Table(Table::new());
    }
    if let Value::Table(nested) = nested {
        merge_at_path(nested, rest, value);
    }
}

fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
