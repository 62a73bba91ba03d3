use roster_core::database::KeyScheme;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";

/// Fully resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub redis: RedisConfig,
    pub keys: KeyScheme,
    /// Application whose users are listed when none is given explicitly.
    pub app_id: Option<String>,
    pub seed: SeedConfig,
    #[serde(skip)]
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedConfig {
    pub users: usize,
    pub email_domain: String,
    pub with_scores: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 10,
            email_domain: "example.com".to_string(),
            with_scores: false,
        }
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
