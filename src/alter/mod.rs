//! Ordered override pipeline over a base profile mapping.

pub mod example;

use std::fmt;

use thiserror::Error;

use crate::Profiles;

/// An override callback: receives the accumulated profiles and amends them.
pub trait ProfileAlter: Send + Sync {
    fn alter(&self, profiles: &mut Profiles);
}

impl<F> ProfileAlter for F
where
    F: Fn(&mut Profiles) + Send + Sync,
{
    fn alter(&self, profiles: &mut Profiles) {
        self(profiles)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlterError {
    #[error("base profile mapping is empty")]
    EmptyBase,

    #[error("step '{step}' removed base profile '{profile}'")]
    ProfileRemoved { profile: String, step: String },
}

type Transform = Box<dyn Fn(Profiles) -> Profiles + Send + Sync>;

struct Step {
    name: String,
    transform: Transform,
}

/// Override steps applied in registration order.
///
/// Each step sees the output of the one before it, so when two steps write
/// the same key the later registration wins. Steps may add profiles or
/// amend existing ones but must keep every profile of the base.
///
/// ```
/// use markercluster_config::{AlterPipeline, Profile, Profiles};
///
/// let base = Profiles::new().with("OSM Mapnik", Profile::default());
/// let profiles = AlterPipeline::new()
///     .with_alter("radius", |p: &mut Profiles| {
///         p.entry("OSM Mapnik").settings.set("maxClusterRadius", 80);
///     })
///     .apply(base)?;
///
/// assert_eq!(
///     profiles.get("OSM Mapnik").unwrap().settings.max_cluster_radius(),
///     Some(80)
/// );
/// # Ok::<(), markercluster_config::AlterError>(())
/// ```
#[derive(Default)]
#[must_use = "pipelines do nothing until .apply() is called"]
pub struct AlterPipeline {
    steps: Vec<Step>,
}

impl AlterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback that amends the profiles in place.
    pub fn with_alter(mut self, name: impl Into<String>, alter: impl ProfileAlter + 'static) -> Self {
        self.steps.push(Step {
            name: name.into(),
            transform: Box::new(move |mut profiles| {
                alter.alter(&mut profiles);
                profiles
            }),
        });
        self
    }

    /// Registers a pure transform from one mapping to the next.
    pub fn with_transform<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Profiles) -> Profiles + Send + Sync + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            transform: Box::new(transform),
        });
        self
    }

    /// Appends the steps of `other` after this pipeline's own.
    pub fn chain(mut self, other: AlterPipeline) -> Self {
        self.steps.extend(other.steps);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Folds every step over `base`.
    pub fn apply(&self, base: Profiles) -> Result<Profiles, AlterError> {
        if base.is_empty() {
            return Err(AlterError::EmptyBase);
        }

        let base_names: Vec<String> = base.names().map(str::to_string).collect();

        self.steps.iter().try_fold(base, |profiles, step| {
            let profiles = (step.transform)(profiles);

            if let Some(missing) = base_names.iter().find(|name| !profiles.contains(name)) {
                return Err(AlterError::ProfileRemoved {
                    profile: missing.clone(),
                    step: step.name.clone(),
                });
            }

            tracing::debug!(step = %step.name, profiles = profiles.len(), "applied profile alter");
            Ok(profiles)
        })
    }
}

impl fmt::Debug for AlterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlterPipeline")
            .field("steps", &self.steps.iter().map(|s| &s.name).collect::<Vec<_>>())
            .finish()
    }
}
