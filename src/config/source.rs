use toml::{Table, Value};

use super::ConfigError;
use crate::{ClusterOption, IconDescriptor};

/// A value contributed by a source, placed at `path` in the merged document.
#[derive(Debug, Clone)]
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

/// Something the loader can read profile definitions from.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// Merges `value` into `table` at `path`.
///
/// Path segments need not match key spelling exactly: `OSM_MAPNIK` finds an
/// existing `OSM Mapnik` table and `MAXCLUSTERRADIUS` becomes
/// `maxClusterRadius`.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    let key = canonical_key(table, first);

    if rest.is_empty() {
        match (table.get_mut(&key), value) {
            (Some(Value::Table(base)), Value::Table(overlay)) => deep_merge(base, overlay),
            (_, value) => {
                table.insert(key, value);
            }
        }
        return;
    }

    if !matches!(table.get(&key), Some(Value::Table(_))) {
        table.insert(key.clone(), Value::Table(Table::new()));
    }

    if let Some(Value::Table(nested)) = table.get_mut(&key) {
        merge_at_path(nested, rest, value);
    }
}

/// Nested tables merge recursively; anything else is replaced.
pub fn deep_merge(base: &mut Table, overlay: Table) {
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

const PROFILE_KEYS: [&str; 2] = ["settings", "markercluster_icon"];

fn canonical_key(table: &Table, segment: &str) -> String {
    if table.contains_key(segment) {
        return segment.to_string();
    }

    let wanted = fold(segment);
    if let Some(existing) = table.keys().find(|key| fold(key) == wanted) {
        return existing.clone();
    }

    ClusterOption::ALL
        .iter()
        .map(|option| option.key())
        .chain(IconDescriptor::KEYS)
        .chain(PROFILE_KEYS)
        .find(|known| fold(known) == wanted)
        .map(str::to_string)
        .unwrap_or_else(|| segment.to_lowercase())
}

fn fold(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
