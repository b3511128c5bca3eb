//! `${section.field}` references inside string values.
//!
//! A reference is replaced with the scalar it points at, after that value's
//! own references are expanded. `$$` produces a literal `$` and is never
//! expanded further.

use super::ConfigError;
use toml::{Table, Value};

/// Expands every reference in `table`, looking paths up in the merged document.
pub fn resolve_references(table: &mut Table) -> Result<(), ConfigError> {
    let root = table.clone();
    let mut visiting = Vec::new();
    resolve_table(table, &root, &mut visiting)
}

fn resolve_table(table: &mut Table, root: &Table, visiting: &mut Vec<String>) -> Result<(), ConfigError> {
    table
        .iter_mut()
        .try_for_each(|(_, value)| resolve_value(value, root, visiting))
}

fn resolve_value(value: &mut Value, root: &Table, visiting: &mut Vec<String>) -> Result<(), ConfigError> {
    match value {
        Value::String(s) => {
            if s.contains('$') {
                *s = expand(s, root, visiting)?;
            }
            Ok(())
        }
        Value::Table(t) => resolve_table(t, root, visiting),
        Value::Array(items) => items
            .iter_mut()
            .try_for_each(|item| resolve_value(item, root, visiting)),
        _ => Ok(()),
    }
}

fn expand(s: &str, root: &Table, visiting: &mut Vec<String>) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        if let Some(tail) = rest.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('{') {
            let end = tail.find('}').ok_or(ConfigError::UnclosedReference)?;
            out.push_str(&lookup(root, &tail[..end], visiting)?);
            rest = &tail[end + 1..];
        } else {
            out.push('$');
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup(root: &Table, path: &str, visiting: &mut Vec<String>) -> Result<String, ConfigError> {
    if path.split('.').any(str::is_empty) {
        return Err(ConfigError::InvalidReferencePath(path.to_string()));
    }
    if visiting.iter().any(|p| p == path) {
        return Err(ConfigError::CircularReference(path.to_string()));
    }

    let not_found = || ConfigError::ReferenceNotFound(path.to_string());
    let mut segments = path.split('.');
    let first = segments.next().ok_or_else(not_found)?;
    let mut current = root.get(first).ok_or_else(not_found)?;
    for segment in segments {
        current = current
            .as_table()
            .and_then(|t| t.get(segment))
            .ok_or_else(not_found)?;
    }

    match current {
        Value::String(s) => {
            visiting.push(path.to_string());
            let expanded = expand(s, root, visiting);
            visiting.pop();
            expanded
        }
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(ConfigError::NonScalarReference(path.to_string())),
    }
}
