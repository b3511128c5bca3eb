use toml::Value;

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Profile overrides from environment variables.
///
/// `MARKERCLUSTER__MAPS__OSM_MAPNIK__SETTINGS__MAXCLUSTERRADIUS=60` sets
/// `maxClusterRadius` on the `OSM Mapnik` profile.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
    vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
    /// An empty `separator` is reported by [`entries`](ConfigSource::entries).
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            vars: None,
        }
    }

    /// Reads from `vars` instead of the process environment.
    pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn entry(&self, key: &str, value: &str) -> Option<ConfigEntry> {
        let rest = key
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix(self.separator.as_str())?;
        if rest.is_empty() {
            return None;
        }

        let path = rest.split(self.separator.as_str()).map(str::to_string).collect();
        Some(ConfigEntry::at_path(path, coerce_value(value)))
    }
}

impl ConfigSource for EnvSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::EmptyEnvSeparator(self.prefix.clone()));
        }

        let entries: Vec<_> = match &self.vars {
            Some(vars) => vars.iter().filter_map(|(k, v)| self.entry(k, v)).collect(),
            None => std::env::vars()
                .filter_map(|(k, v)| self.entry(&k, &v))
                .collect(),
        };

        if !entries.is_empty() {
            tracing::debug!(prefix = %self.prefix, count = entries.len(), "loaded profile overrides from environment");
        }
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

    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_strip_prefix_and_split() {
        let source = EnvSource::new("MC", "__").with_vars([
            ("MC__MAPS__OSM_MAPNIK__SETTINGS__MAXCLUSTERRADIUS", "60"),
            ("OTHER__MAPS__X", "1"),
            ("MC__", "ignored"),
        ]);
        let entries = source.entries().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].path,
            vec!["MAPS", "OSM_MAPNIK", "SETTINGS", "MAXCLUSTERRADIUS"]
        );
        assert_eq!(entries[0].value, Value::Integer(60));
    }

    #[test]
    fn test_empty_separator_is_an_error() {
        let source = EnvSource::new("MC", "").with_vars([("MCMAPS", "1")]);
        let result = source.entries();
        assert!(matches!(result, Err(ConfigError::EmptyEnvSeparator(prefix)) if prefix == "MC"));
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("TRUE"), Value::Boolean(true));
        assert_eq!(coerce_value("false"), Value::Boolean(false));
        assert_eq!(coerce_value("-8"), Value::Integer(-8));
        assert_eq!(coerce_value("1.5"), Value::Float(1.5));
        assert_eq!(
            coerce_value("/files/icon.png"),
            Value::String("/files/icon.png".into())
        );
        assert_eq!(coerce_value("-"), Value::String("-".into()));
    }
}
