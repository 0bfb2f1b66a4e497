//! Environment variable configuration source.

use toml::Value;

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Reads `PREFIX<sep>SECTION<sep>FIELD=value` variables as config overrides.
///
/// Path segments are lowercased, so `BUILD__SERVER__PORT=8080` sets
/// `server.port`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    /// # Panics
    ///
    /// Panics if `separator` is empty.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    fn entry_for(&self, key: &str, value: &str) -> Option<ConfigEntry> {
        let rest = key
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix(self.separator.as_str())?;
        if rest.is_empty() {
            return None;
        }

        let path = rest
            .split(self.separator.as_str())
            .map(str::to_lowercase)
            .collect::<Vec<_>>();
        if path.iter().any(String::is_empty) {
            return None;
        }

        Some(ConfigEntry::at_path(path, coerce_value(value)))
    }
}

impl ConfigSource for EnvSource {
    fn describe(&self) -> String {
        format!("environment '{}{}*'", self.prefix, self.separator)
    }

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let mut entries = std::env::vars()
            .filter_map(|(key, value)| self.entry_for(&key, &value))
            .collect::<Vec<_>>();
        // env iteration order is unspecified
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_owned())
}

fn looks_like_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("TRUE"), Value::Boolean(true));
        assert_eq!(coerce_value("false"), Value::Boolean(false));
        assert_eq!(coerce_value("5173"), Value::Integer(5173));
        assert_eq!(coerce_value("-1"), Value::Integer(-1));
        assert_eq!(coerce_value("1.5"), Value::Float(1.5));
        assert_eq!(coerce_value("dist"), Value::String("dist".into()));
        // dotted paths stay strings
        assert_eq!(coerce_value("./dist"), Value::String("./dist".into()));
    }

    #[test]
    fn test_entry_for_maps_path_segments() {
        let source = EnvSource::new("BUILD", "__");

        let entry = source.entry_for("BUILD__SERVER__PORT", "8080").unwrap();

        assert_eq!(entry.path, vec!["server".to_string(), "port".to_string()]);
        assert_eq!(entry.value, Value::Integer(8080));
    }

    #[test]
    fn test_entry_for_ignores_foreign_and_malformed_keys() {
        let source = EnvSource::new("BUILD", "__");

        assert!(source.entry_for("BUILDER__SERVER__PORT", "1").is_none());
        assert!(source.entry_for("BUILD__", "1").is_none());
        assert!(source.entry_for("BUILD__SERVER____PORT", "1").is_none());
        assert!(source.entry_for("PATH", "/usr/bin").is_none());
    }

    #[test]
    fn test_entries_reads_process_environment() {
        std::env::set_var("ENVSRC_TEST__SERVER__OPEN", "false");
        std::env::set_var("ENVSRC_TEST__BASE", "/docs/");

        let entries = EnvSource::new("ENVSRC_TEST", "__").entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, vec!["base".to_string()]);
        assert_eq!(entries[0].value, Value::String("/docs/".into()));
        assert_eq!(entries[1].value, Value::Boolean(false));
    }

    #[test]
    #[should_panic(expected = "separator must not be empty")]
    fn test_empty_separator_panics() {
        let _ = EnvSource::new("BUILD", "");
    }
}
