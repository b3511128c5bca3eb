use std::path::Path;

use toml::{Table, Value};

use super::env::EnvSource;
use super::file::FileSource;
use super::resolve::resolve_references;
use super::source::{merge_at_path, ConfigSource};
use super::ConfigError;
use crate::Profiles;

const DEFAULT_SECTION: &str = "maps";

/// Builds the base profile mapping from layered sources.
///
/// Sources are merged in registration order, later ones overriding earlier
/// ones. Nested tables merge recursively; other values (including arrays)
/// are replaced. Profiles live under the `maps` table unless
/// [`with_section`](Self::with_section) names another; other top-level
/// tables are free for shared values.
///
/// ## Variable References
///
/// Strings can reference any value in the merged document with
/// `${path.to.field}`; `$$` escapes a literal `$`:
///
/// ```toml
/// [paths]
/// files = "/sites/default/files"
///
/// [maps."OSM Mapnik".settings]
/// maxClusterRadius = 80
///
/// [maps."OSM Mapnik".markercluster_icon]
/// iconUrl = "${paths.files}/icon.png"
/// iconSize = { x = 20, y = 40 }
/// ```
///
/// ## Example
///
/// ```no_run
/// use markercluster_config::ProfileLoader;
///
/// let profiles = ProfileLoader::builder()
///     .with_file("config/maps.toml", true)
///     .with_env("MARKERCLUSTER", "__")
///     .with_file("config/maps.local.toml", false)
///     .load()?;
/// # Ok::<(), markercluster_config::ConfigError>(())
/// ```
#[derive(Debug)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct ProfileLoader {
    sources: Vec<Box<dyn ConfigSource>>,
    section: String,
}

impl Default for ProfileLoader {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            section: DEFAULT_SECTION.to_string(),
        }
    }
}

impl ProfileLoader {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file. Missing required files fail the load; missing
    /// optional files are skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds environment variables starting with `prefix` followed by
    /// `separator`. The remaining name, split on `separator`, is the path to
    /// set; segments are matched against existing keys ignoring case, spaces,
    /// underscores and dashes, so `OSM_MAPNIK` reaches `"OSM Mapnik"`.
    ///
    /// Values are coerced to boolean, integer, float, or left as strings.
    ///
    /// ```no_run
    /// # use markercluster_config::ProfileLoader;
    /// // MARKERCLUSTER__MAPS__OSM_MAPNIK__SETTINGS__MAXCLUSTERRADIUS=60
    /// let profiles = ProfileLoader::builder()
    ///     .with_file("config/maps.toml", true)
    ///     .with_env("MARKERCLUSTER", "__")
    ///     .load()?;
    /// # Ok::<(), markercluster_config::ConfigError>(())
    /// ```
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Names the top-level table holding the profiles.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Merges every source, resolves references, and deserializes the
    /// profile section. A document without the section yields no profiles.
    pub fn load(self) -> Result<Profiles, ConfigError> {
        let mut merged = Table::new();

        for source in &self.sources {
            for entry in source.entries()? {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        resolve_references(&mut merged)?;

        let section = match merged.remove(&self.section) {
            Some(Value::Table(section)) => section,
            Some(_) => return Err(ConfigError::SectionNotTable(self.section)),
            None => {
                tracing::warn!(section = %self.section, "no profile section in loaded configuration");
                Table::new()
            }
        };

        let profiles: Profiles = Value::Table(section).try_into().map_err(|source| {
            ConfigError::DeserializeError {
                section: self.section.clone(),
                source,
            }
        })?;

        tracing::debug!(profiles = profiles.len(), "loaded base profiles");
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapInfo, Point};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_later_files_override_earlier() {
        let defaults = toml_file(
            r#"
            [maps."OSM Mapnik".settings]
            maxClusterRadius = 80
            spiderfyOnMaxZoom = true
            "#,
        );
        let local = toml_file(
            r#"
            [maps."OSM Mapnik".settings]
            maxClusterRadius = 40
            "#,
        );

        let profiles = ProfileLoader::builder()
            .with_file(defaults.path(), true)
            .with_file(local.path(), true)
            .with_file("/nonexistent/maps.toml", false)
            .load()
            .unwrap();

        let settings = &profiles.get("OSM Mapnik").unwrap().settings;
        assert_eq!(settings.max_cluster_radius(), Some(40));
        assert_eq!(settings.len(), 2);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file(
            r#"
            [maps."OSM Mapnik".settings]
            maxClusterRadius = 80
            "#,
        );

        let profiles = ProfileLoader::builder()
            .with_file(file.path(), true)
            .with_source(EnvSource::new("MC", "__").with_vars([
                ("MC__MAPS__OSM_MAPNIK__SETTINGS__MAXCLUSTERRADIUS", "60"),
                ("MC__MAPS__OSM_MAPNIK__SETTINGS__ANIMATEADDINGMARKERS", "true"),
            ]))
            .load()
            .unwrap();

        assert_eq!(profiles.len(), 1);
        let settings = &profiles.get("OSM Mapnik").unwrap().settings;
        assert_eq!(settings.max_cluster_radius(), Some(60));
        assert_eq!(
            settings.get("animateAddingMarkers"),
            Some(&Value::Boolean(true))
        );
    }

    #[test]
    fn test_icon_references_resolve_before_deserializing() {
        let file = toml_file(
            r#"
            [paths]
            files = "/sites/default/files"

            [maps."OSM Mapnik".markercluster_icon]
            iconUrl = "${paths.files}/icon.png"
            iconSize = { x = "20", y = "40" }
            "#,
        );

        let profiles = ProfileLoader::builder()
            .with_file(file.path(), true)
            .load()
            .unwrap();

        let icon = profiles
            .get("OSM Mapnik")
            .unwrap()
            .markercluster_icon
            .as_ref()
            .unwrap();
        assert_eq!(icon.icon_url.as_deref(), Some("/sites/default/files/icon.png"));
        assert_eq!(icon.icon_size, Some(Point::new(20, 40)));
        assert!(!profiles.contains("paths"));
    }

    #[test]
    fn test_custom_section_and_missing_section() {
        let file = toml_file(
            r#"
            [leaflet.Satellite.settings]
            maxClusterRadius = 30
            "#,
        );

        let profiles = ProfileLoader::builder()
            .with_file(file.path(), true)
            .with_section("leaflet")
            .load()
            .unwrap();
        assert!(profiles.contains("Satellite"));

        let empty = ProfileLoader::builder()
            .with_file(file.path(), true)
            .load()
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_section_must_be_a_table() {
        let file = toml_file(r#"maps = "OSM Mapnik""#);
        let result = ProfileLoader::builder()
            .with_file(file.path(), true)
            .load();
        assert!(matches!(result, Err(ConfigError::SectionNotTable(_))));
    }

    #[test]
    fn test_empty_env_separator_fails_the_load() {
        let file = toml_file(
            r#"
            [maps."OSM Mapnik".settings]
            maxClusterRadius = 80
            "#,
        );
        let result = ProfileLoader::builder()
            .with_file(file.path(), true)
            .with_env("MARKERCLUSTER", "")
            .load();
        assert!(matches!(result, Err(ConfigError::EmptyEnvSeparator(_))));
    }

    #[test]
    fn test_wrong_typed_icon_values_reach_the_renderer() {
        let file = toml_file(
            r#"
            [maps."OSM Mapnik".markercluster_icon]
            iconUrl = 5
            iconSize = "20x40"
            iconAnchor = { x = 20, y = 40 }
            "#,
        );
        let profiles = ProfileLoader::builder()
            .with_file(file.path(), true)
            .load()
            .unwrap();

        let icon = profiles
            .get("OSM Mapnik")
            .unwrap()
            .markercluster_icon
            .as_ref()
            .unwrap();
        assert_eq!(icon.icon_url, None);
        assert_eq!(icon.icon_anchor, Some(Point::new(20, 40)));

        let info = MapInfo::builder().with_profiles(profiles).build().unwrap();
        let json = info.to_json().unwrap();
        let icon_json = &json["OSM Mapnik"]["markercluster_icon"];
        assert_eq!(icon_json["iconUrl"], 5);
        assert_eq!(icon_json["iconSize"], "20x40");
        assert_eq!(icon_json["iconAnchor"], serde_json::json!({ "x": 20, "y": 40 }));
    }

    #[test]
    fn test_half_point_fails_to_deserialize() {
        let file = toml_file(
            r#"
            [maps."OSM Mapnik".markercluster_icon]
            iconAnchor = { x = 20 }
            "#,
        );
        let result = ProfileLoader::builder()
            .with_file(file.path(), true)
            .load();
        assert!(matches!(result, Err(ConfigError::DeserializeError { .. })));
    }
}
