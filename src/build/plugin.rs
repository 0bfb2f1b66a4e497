use serde::{Deserialize, Serialize};
use toml::Table;

/// An opaque bundler plugin reference.
///
/// The crate never interprets a plugin: the name and options are handed to
/// the bundler exactly as configured. In TOML a plugin is either a bare name
/// or a table:
///
/// ```toml
/// plugins = ["vue", { name = "legacy", options = { targets = ["defaults"] } }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PluginRepr", into = "PluginRepr")]
pub struct PluginHandle {
    name: String,
    options: Table,
}

impl PluginHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Table::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Table) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Table {
        &self.options
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PluginRepr {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Table::is_empty")]
        options: Table,
    },
}

impl From<PluginRepr> for PluginHandle {
    fn from(repr: PluginRepr) -> Self {
        match repr {
            PluginRepr::Name(name) => Self::new(name),
            PluginRepr::Detailed { name, options } => Self { name, options },
        }
    }
}

impl From<PluginHandle> for PluginRepr {
    fn from(handle: PluginHandle) -> Self {
        if handle.options.is_empty() {
            Self::Name(handle.name)
        } else {
            Self::Detailed {
                name: handle.name,
                options: handle.options,
            }
        }
    }
}
