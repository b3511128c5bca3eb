//! Assembles marker-cluster settings for map profiles.
//!
//! Base profiles come from a [`ProfileLoader`] (or the host directly), an
//! [`AlterPipeline`] of override callbacks amends them in registration
//! order, and [`MapInfo`] freezes the result for the client-side renderer.

pub mod alter;
pub mod config;
pub mod context;
mod error;
pub mod profile;

pub use alter::{AlterError, AlterPipeline, ProfileAlter};
pub use config::{ConfigError, ProfileLoader};
pub use context::{MapInfo, MapInfoBuilder};
pub use error::Error;
pub use profile::{
    ClusterOption, ClusteringCutoff, IconDescriptor, Point, Profile, Profiles, Settings,
    ValidationError, ValidationIssue, ValidationMode,
};
