//! The frozen profile mapping handed to the map renderer.

use toml::Value;

use crate::alter::{AlterPipeline, ProfileAlter};
use crate::{Error, Profile, Profiles};

/// Final map profiles, read-only once built.
///
/// The renderer consumes this directly or through [`to_json`](Self::to_json).
///
/// ## Example
///
/// ```
/// use markercluster_config::alter::example::mapnik_cluster_alter;
/// use markercluster_config::{MapInfo, Profile, Profiles};
///
/// let info = MapInfo::builder()
///     .with_profiles(Profiles::new().with("OSM Mapnik", Profile::default()))
///     .with_alter("mapnik clustering", mapnik_cluster_alter)
///     .build()?;
///
/// let json = info.profile_json("OSM Mapnik")?.unwrap();
/// assert_eq!(json["settings"]["maxClusterRadius"], 80);
/// # Ok::<(), markercluster_config::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    profiles: Profiles,
}

impl MapInfo {
    pub fn builder() -> MapInfoBuilder {
        MapInfoBuilder::default()
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn into_profiles(self) -> Profiles {
        self.profiles
    }

    /// Every profile as the JSON object the client-side map expects.
    ///
    /// Pass-through values are written as plain JSON; TOML datetimes become
    /// their RFC 3339 strings.
    pub fn to_json(&self) -> Result<serde_json::Value, Error> {
        let profiles = self
            .profiles
            .iter()
            .map(|(name, profile)| Ok((name.to_string(), profile_payload(profile)?)))
            .collect::<Result<serde_json::Map<_, _>, Error>>()?;
        Ok(serde_json::Value::Object(profiles))
    }

    pub fn profile_json(&self, name: &str) -> Result<Option<serde_json::Value>, Error> {
        self.profile(name).map(profile_payload).transpose()
    }
}

/// Opaque values live in `settings` and the two `extra` tables; those are
/// rewritten from the TOML values so nothing leaks TOML's serde encoding.
fn profile_payload(profile: &Profile) -> Result<serde_json::Value, Error> {
    let mut json = serde_json::to_value(profile)?;

    if let Some(object) = json.as_object_mut() {
        object.insert(
            "settings".to_string(),
            object_json(profile.settings.iter()),
        );
        object.extend(profile.extra.iter().map(|(k, v)| (k.clone(), value_json(v))));

        let icon_json = object
            .get_mut("markercluster_icon")
            .and_then(serde_json::Value::as_object_mut);
        if let (Some(icon), Some(icon_json)) = (&profile.markercluster_icon, icon_json) {
            icon_json.extend(icon.extra.iter().map(|(k, v)| (k.clone(), value_json(v))));
        }
    }

    Ok(json)
}

fn object_json<'a>(entries: impl Iterator<Item = (&'a str, &'a Value)>) -> serde_json::Value {
    serde_json::Value::Object(
        entries
            .map(|(k, v)| (k.to_string(), value_json(v)))
            .collect(),
    )
}

fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_json).collect()),
        Value::Table(table) => object_json(table.iter().map(|(k, v)| (k.as_str(), v))),
    }
}

/// Builder for [`MapInfo`]: base profiles plus the alters to run over them.
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct MapInfoBuilder {
    profiles: Option<Profiles>,
    pipeline: AlterPipeline,
}

impl MapInfoBuilder {
    pub fn with_profiles(mut self, profiles: Profiles) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn with_alter(mut self, name: impl Into<String>, alter: impl ProfileAlter + 'static) -> Self {
        self.pipeline = self.pipeline.with_alter(name, alter);
        self
    }

    pub fn with_transform<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Profiles) -> Profiles + Send + Sync + 'static,
    {
        self.pipeline = self.pipeline.with_transform(name, transform);
        self
    }

    /// Appends an already assembled pipeline after the alters registered so far.
    pub fn with_pipeline(mut self, pipeline: AlterPipeline) -> Self {
        self.pipeline = self.pipeline.chain(pipeline);
        self
    }

    /// Runs the alters and freezes the result.
    ///
    /// Fails if no base profiles were provided or an alter breaks the
    /// pipeline's guarantees.
    pub fn build(self) -> Result<MapInfo, Error> {
        let base = self.profiles.ok_or(Error::MissingProfiles)?;
        let profiles = self.pipeline.apply(base)?;
        Ok(MapInfo { profiles })
    }
}
