//! `${section.field}` references between configuration values.
//!
//! References are substituted after every source is merged, so a value from
//! one layer can point at a value from another. `$${...}` yields a literal
//! `${...}`.

use super::ConfigError;
use toml::{Table, Value};

/// Upper bound on substitution passes before a chain is considered circular.
const MAX_PASSES: usize = 100;

/// Substitutes every reference in `table`, repeating until a pass makes no
/// substitutions.
pub fn resolve_references(table: &mut Table) -> Result<(), ConfigError> {
    for _ in 0..MAX_PASSES {
        let snapshot = table.clone();
        let mut substitutions = 0;
        for (_key, value) in table.iter_mut() {
            substitutions += resolve_value(value, &snapshot)?;
        }
        if substitutions == 0 {
            for (_key, value) in table.iter_mut() {
                unescape(value);
            }
            return Ok(());
        }
    }

    Err(ConfigError::CircularReference)
}

fn resolve_value(value: &mut Value, root: &Table) -> Result<usize, ConfigError> {
    match value {
        Value::String(s) => {
            if !s.contains('$') {
                return Ok(0);
            }
            let (resolved, count) = substitute(s, root)?;
            *s = resolved;
            Ok(count)
        }
        Value::Table(t) => t.iter_mut().map(|(_, v)| resolve_value(v, root)).sum(),
        Value::Array(items) => items.iter_mut().map(|v| resolve_value(v, root)).sum(),
        _ => Ok(0),
    }
}

/// Returns `s` with references replaced, plus how many were replaced.
///
/// `$$` escapes are left in place until every pass is done.
fn substitute(s: &str, root: &Table) -> Result<(String, usize), ConfigError> {
    let mut out = String::with_capacity(s.len());
    let mut count = 0;
    let mut rest = s;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx + 1..];

        if let Some(after) = tail.strip_prefix('$') {
            out.push_str("$$");
            rest = after;
        } else if let Some(after) = tail.strip_prefix('{') {
            let end = after.find('}').ok_or(ConfigError::UnclosedReference)?;
            out.push_str(&lookup_path(root, &after[..end])?);
            count += 1;
            rest = &after[end + 1..];
        } else {
            out.push('$');
            rest = tail;
        }
    }
    out.push_str(rest);

    Ok((out, count))
}

fn unescape(value: &mut Value) {
    match value {
        Value::String(s) if s.contains("$$") => *s = s.replace("$$", "$"),
        Value::Table(t) => t.iter_mut().for_each(|(_, v)| unescape(v)),
        Value::Array(items) => items.iter_mut().for_each(unescape),
        _ => {}
    }
}

/// Looks up a dotted path and renders the scalar found there.
fn lookup_path(root: &Table, path: &str) -> Result<String, ConfigError> {
    if path.split('.').any(str::is_empty) {
        return Err(ConfigError::InvalidReferencePath(path.to_owned()));
    }
    let mut segments = path.split('.');

    let not_found = || ConfigError::ReferenceNotFound(path.to_owned());
    let first = segments.next().ok_or_else(not_found)?;
    let mut current = root.get(first).ok_or_else(not_found)?;
    for segment in segments {
        current = current
            .as_table()
            .and_then(|t| t.get(segment))
            .ok_or_else(not_found)?;
    }

    match current {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(ConfigError::NonScalarReference(path.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(toml_str: &str) -> Table {
        let mut table: Table = toml::from_str(toml_str).unwrap();
        resolve_references(&mut table).unwrap();
        table
    }

    fn failure(toml_str: &str) -> ConfigError {
        let mut table: Table = toml::from_str(toml_str).unwrap();
        resolve_references(&mut table).unwrap_err()
    }

    #[test]
    fn test_dev_server_url_from_sections() {
        let table = resolved(
            r#"
            base = "/search/"

            [server]
            port = 5173
            url = "http://localhost:${server.port}${base}"
            "#,
        );

        assert_eq!(
            table["server"]["url"].as_str(),
            Some("http://localhost:5173/search/")
        );
    }

    #[test]
    fn test_chained_references() {
        let table = resolved(
            r#"
            root = "/srv/app"
            src = "${root}/src"

            [resolve.alias]
            "@" = "${src}"
            "#,
        );

        assert_eq!(table["resolve"]["alias"]["@"].as_str(), Some("/srv/app/src"));
    }

    #[test]
    fn test_references_inside_arrays() {
        let table = resolved(
            r#"
            out = "dist"
            cleanup = ["${out}/assets", "${out}/index.html"]
            "#,
        );

        let cleanup = table["cleanup"].as_array().unwrap();
        assert_eq!(cleanup[0].as_str(), Some("dist/assets"));
        assert_eq!(cleanup[1].as_str(), Some("dist/index.html"));
    }

    #[test]
    fn test_escape_and_lone_dollar() {
        let table = resolved(
            r#"
            banner = "costs $5, write $${base} literally"
            "#,
        );

        assert_eq!(
            table["banner"].as_str(),
            Some("costs $5, write ${base} literally")
        );
    }

    #[test]
    fn test_escape_survives_later_passes() {
        let table = resolved(
            r#"
            a = "x"
            b = "${a}"
            c = "${b} and $${a}"
            "#,
        );

        assert_eq!(table["c"].as_str(), Some("x and ${a}"));
    }

    #[test]
    fn test_nested_tables_resolve_and_unescape() {
        let table = resolved(
            r#"
            [build]
            out_dir = "dist"

            [server.proxy]
            target = "${build.out_dir}/api"
            note = "see $${build.out_dir}"
            "#,
        );

        assert_eq!(table["server"]["proxy"]["target"].as_str(), Some("dist/api"));
        assert_eq!(
            table["server"]["proxy"]["note"].as_str(),
            Some("see ${build.out_dir}")
        );
    }

    #[test]
    fn test_boolean_rendering() {
        let table = resolved(
            r#"
            open = true
            flag = "--open=${open}"
            "#,
        );

        assert_eq!(table["flag"].as_str(), Some("--open=true"));
    }

    #[test]
    fn test_circular_reference() {
        let err = failure(
            r#"
            a = "${b}"
            b = "${a}"
            "#,
        );

        assert!(matches!(err, ConfigError::CircularReference));
    }

    #[test]
    fn test_missing_reference() {
        let err = failure(r#"url = "${server.host}""#);

        assert!(matches!(err, ConfigError::ReferenceNotFound(p) if p == "server.host"));
    }

    #[test]
    fn test_invalid_path() {
        let err = failure(r#"url = "${server..port}""#);

        assert!(matches!(err, ConfigError::InvalidReferencePath(_)));
    }

    #[test]
    fn test_non_scalar_reference() {
        let err = failure(
            r#"
            copy = "${server}"
            [server]
            port = 1
            "#,
        );

        assert!(matches!(err, ConfigError::NonScalarReference(_)));
    }

    #[test]
    fn test_unclosed_reference() {
        let err = failure(r#"url = "http://${server.port""#);

        assert!(matches!(err, ConfigError::UnclosedReference));
    }
}
