use std::fmt;

use thiserror::Error;
use toml::Value;

use super::{ClusterOption, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Check the types of recognized options only.
    #[default]
    Lenient,
    /// Also reject options the clustering library is not known to accept.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub profile: String,
    pub key: String,
    pub reason: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.profile, self.key, self.reason)
    }
}

#[derive(Debug, Error)]
#[error("{} invalid cluster option(s): {}", .issues.len(), join(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub(super) fn check_settings(
    profile: &str,
    settings: &Settings,
    mode: ValidationMode,
) -> Vec<ValidationIssue> {
    let issue = |key: &str, reason: &str| ValidationIssue {
        profile: profile.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    };

    settings
        .iter()
        .filter_map(|(key, value)| match ClusterOption::from_key(key) {
            Some(option) => check_option(option, value).map(|reason| issue(key, reason)),
            None if mode == ValidationMode::Strict => Some(issue(key, "unrecognized option")),
            None => None,
        })
        .collect()
}

fn check_option(option: ClusterOption, value: &Value) -> Option<&'static str> {
    match (option, value) {
        (o, Value::Boolean(_)) if o.is_flag() => None,
        (o, _) if o.is_flag() => Some("expected a boolean"),
        (ClusterOption::MaxClusterRadius, Value::Integer(r)) if *r > 0 => None,
        (ClusterOption::MaxClusterRadius, _) => Some("expected a positive integer"),
        (ClusterOption::DisableClusteringAtZoom, Value::Boolean(false)) => None,
        (ClusterOption::DisableClusteringAtZoom, Value::Integer(z)) if *z >= 0 => None,
        (ClusterOption::DisableClusteringAtZoom, _) => {
            Some("expected false or a non-negative zoom level")
        }
        _ => None,
    }
}
