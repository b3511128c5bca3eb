//! Loading base profiles from layered TOML files and the environment.

mod builder;
mod env;
mod error;
mod file;
mod resolve;
mod source;

pub use builder::ProfileLoader;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{ConfigEntry, ConfigSource};
