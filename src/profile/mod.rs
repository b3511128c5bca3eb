//! Map profiles and their clustering options.

mod icon;
mod settings;
mod validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use icon::{IconDescriptor, Point};
pub use settings::{ClusterOption, ClusteringCutoff, Settings};
pub use validate::{ValidationError, ValidationIssue, ValidationMode};

/// One named map configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markercluster_icon: Option<IconDescriptor>,
    /// Remaining keys of the host's map definition (label, layers, ...).
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Profile {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Attaches `icon`, replacing any previous one as a whole.
    pub fn set_icon(&mut self, icon: IconDescriptor) -> Option<IconDescriptor> {
        self.markercluster_icon.replace(icon)
    }
}

/// Profiles keyed by their unique name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profiles(BTreeMap<String, Profile>);

impl Profiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.0.get_mut(name)
    }

    /// Returns the named profile, creating an empty one if needed.
    pub fn entry(&mut self, name: impl Into<String>) -> &mut Profile {
        self.0.entry(name.into()).or_default()
    }

    pub fn insert(&mut self, name: impl Into<String>, profile: Profile) -> Option<Profile> {
        self.0.insert(name.into(), profile)
    }

    pub fn with(mut self, name: impl Into<String>, profile: Profile) -> Self {
        self.insert(name, profile);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.0.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks option types across every profile.
    ///
    /// Nothing in the crate calls this implicitly; loading and altering stay
    /// permissive.
    pub fn validate(&self, mode: ValidationMode) -> Result<(), ValidationError> {
        let issues: Vec<_> = self
            .iter()
            .flat_map(|(name, profile)| validate::check_settings(name, &profile.settings, mode))
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Profile)> for Profiles {
    fn from_iter<I: IntoIterator<Item = (S, Profile)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for Profiles {
    type Item = (String, Profile);
    type IntoIter = std::collections::btree_map::IntoIter<String, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
