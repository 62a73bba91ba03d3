//! Configuration loading for Roster.
//!
//! Values are resolved from environment variables first, then a TOML file,
//! then built-in defaults. A `.env` file is read into the environment before
//! anything else.

#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
};
pub use models::{Config, ConfigMetadata, RedisConfig, SeedConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
