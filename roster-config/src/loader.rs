use once_cell::sync::Lazy;
use roster_core::database::KeyScheme;
use std::{fs, path::PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::{
    models::{
        Config, ConfigMetadata, DEFAULT_REDIS_URL, RedisConfig, SeedConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("roster.toml"),
        PathBuf::from("config/roster.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        self.compose(file_config, env_config, config_path, env_file_loaded)
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit_path = self
            .options
            .config_path
            .as_ref()
            .or(env_config.config_path.as_ref());
        let (path, explicit) = match explicit_path {
            Some(path) => (Some(path.clone()), true),
            None => (
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .find(|candidate| candidate.exists())
                    .cloned(),
                false,
            ),
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(&path).map_err(|err| {
            ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            }
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    /// Merge the sources (environment over file over defaults) and apply
    /// guard rails.
    pub fn compose(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No roster.toml detected; using environment and defaults",
                "Create roster.toml or point ROSTER_CONFIG at a file",
            );
        }

        let FileConfig {
            redis: file_redis,
            keys: file_keys,
            app: file_app,
            seed: file_seed,
        } = file_config.unwrap_or_default();

        let redis = RedisConfig {
            url: env
                .redis_url
                .or(file_redis.map(|r| r.url))
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
        };

        let defaults = KeyScheme::default();
        let keys = KeyScheme {
            namespace: env
                .namespace
                .or(file_keys.namespace)
                .unwrap_or(defaults.namespace),
            entity_kind: file_keys.entity_kind.unwrap_or(defaults.entity_kind),
            parent_kind: file_keys.parent_kind.unwrap_or(defaults.parent_kind),
            collection: file_keys.collection.unwrap_or(defaults.collection),
        };

        let seed_defaults = SeedConfig::default();
        let seed = SeedConfig {
            users: env
                .seed_users
                .or(file_seed.users)
                .unwrap_or(seed_defaults.users),
            email_domain: file_seed
                .email_domain
                .unwrap_or(seed_defaults.email_domain),
            with_scores: env
                .seed_with_scores
                .or(file_seed.with_scores)
                .unwrap_or(seed_defaults.with_scores),
        };

        let config = Config {
            redis,
            keys,
            app_id: env.app_id.or(file_app.id),
            seed,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        warnings.extend(validation::apply_guard_rails(&config)?);

        Ok(ConfigLoad { config, warnings })
    }
}
