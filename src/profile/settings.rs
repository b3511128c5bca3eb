//! Marker-cluster settings records.

use serde::{Deserialize, Serialize};
use toml::{Table, Value};

/// A clustering option the settings record knows the type of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterOption {
    ZoomToBoundsOnClick,
    ShowCoverageOnHover,
    SpiderfyOnMaxZoom,
    AnimateAddingMarkers,
    DisableClusteringAtZoom,
    MaxClusterRadius,
}

impl ClusterOption {
    pub const ALL: [ClusterOption; 6] = [
        ClusterOption::ZoomToBoundsOnClick,
        ClusterOption::ShowCoverageOnHover,
        ClusterOption::SpiderfyOnMaxZoom,
        ClusterOption::AnimateAddingMarkers,
        ClusterOption::DisableClusteringAtZoom,
        ClusterOption::MaxClusterRadius,
    ];

    /// The key as the clustering library spells it.
    pub const fn key(self) -> &'static str {
        match self {
            ClusterOption::ZoomToBoundsOnClick => "zoomToBoundsOnClick",
            ClusterOption::ShowCoverageOnHover => "showCoverageOnHover",
            ClusterOption::SpiderfyOnMaxZoom => "spiderfyOnMaxZoom",
            ClusterOption::AnimateAddingMarkers => "animateAddingMarkers",
            ClusterOption::DisableClusteringAtZoom => "disableClusteringAtZoom",
            ClusterOption::MaxClusterRadius => "maxClusterRadius",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.key() == key)
    }

    pub const fn is_flag(self) -> bool {
        !matches!(
            self,
            ClusterOption::DisableClusteringAtZoom | ClusterOption::MaxClusterRadius
        )
    }
}

/// Value of `disableClusteringAtZoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringCutoff {
    /// `false`: markers are clustered at every zoom level.
    Never,
    /// Markers are not clustered at this zoom level and beyond.
    AtZoom(i64),
}

impl From<ClusteringCutoff> for Value {
    fn from(cutoff: ClusteringCutoff) -> Self {
        match cutoff {
            ClusteringCutoff::Never => Value::Boolean(false),
            ClusteringCutoff::AtZoom(zoom) => Value::Integer(zoom),
        }
    }
}

/// Options handed to the clustering library for one profile.
///
/// Values are stored as written. Keys outside [`ClusterOption`] are kept and
/// forwarded, and nothing here checks types; see
/// [`Profiles::validate`](crate::Profiles::validate) for that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Table);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn option(&self, option: ClusterOption) -> Option<&Value> {
        self.0.get(option.key())
    }

    /// Sets `key`, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn set_option(&mut self, option: ClusterOption, value: impl Into<Value>) -> Option<Value> {
        self.set(option.key(), value)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Writes every key of `overlay` over this record. Last writer wins;
    /// nested values are replaced, not merged.
    pub fn extend(&mut self, overlay: Settings) {
        self.0.extend(overlay.0);
    }

    /// Adds the keys of `defaults` that this record does not set yet.
    pub fn fill_defaults(&mut self, defaults: Settings) {
        for (key, value) in defaults.0 {
            self.0.entry(key).or_insert(value);
        }
    }

    pub fn flag(&self, option: ClusterOption) -> Option<bool> {
        if !option.is_flag() {
            return None;
        }
        self.option(option).and_then(Value::as_bool)
    }

    pub fn max_cluster_radius(&self) -> Option<i64> {
        self.option(ClusterOption::MaxClusterRadius)
            .and_then(Value::as_integer)
    }

    pub fn disable_clustering_at_zoom(&self) -> Option<ClusteringCutoff> {
        match self.option(ClusterOption::DisableClusteringAtZoom)? {
            Value::Boolean(false) => Some(ClusteringCutoff::Never),
            Value::Integer(zoom) => Some(ClusteringCutoff::AtZoom(*zoom)),
            _ => None,
        }
    }

    /// Keys the clustering library will receive without this crate knowing them.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| ClusterOption::from_key(key).is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Table> for Settings {
    fn from(table: Table) -> Self {
        Self(table)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
