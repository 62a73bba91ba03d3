use thiserror::Error;

use crate::models::{Config, DEFAULT_REDIS_URL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("key segment `{name}` must not be empty")]
    EmptyKeySegment { name: &'static str },
    #[error("key segment `{name}` must not contain `*` (got {value:?})")]
    WildcardInKeySegment { name: &'static str, value: String },
    #[error("unsupported Redis URL scheme in {url:?}")]
    UnsupportedRedisUrl { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Reject configurations that would produce unusable keys or connections.
///
/// A `*` inside a key segment would be substituted by SORT patterns and read
/// the wrong records, so it is refused outright.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let keys = &config.keys;
    check_segment("keys.namespace", &keys.namespace)?;
    check_segment("keys.entity_kind", &keys.entity_kind)?;
    check_segment("keys.parent_kind", &keys.parent_kind)?;
    check_segment("keys.collection", &keys.collection)?;
    if let Some(app_id) = &config.app_id {
        check_segment("app.id", app_id)?;
    }

    let url = &config.redis.url;
    if !["redis://", "rediss://", "unix://", "redis+unix://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        return Err(ConfigGuardRailError::UnsupportedRedisUrl {
            url: url.clone(),
        });
    }

    if url == DEFAULT_REDIS_URL {
        warnings.push_with_hint(
            "Using the default Redis URL",
            "Set REDIS_URL or [redis].url to point at your server",
        );
    }

    if config.seed.users == 0 {
        warnings.push("seed.users is 0; seeding will not create any users");
    }

    Ok(warnings)
}

fn check_segment(
    name: &'static str,
    value: &str,
) -> Result<(), ConfigGuardRailError> {
    if value.trim().is_empty() {
        return Err(ConfigGuardRailError::EmptyKeySegment { name });
    }
    if value.contains('*') {
        return Err(ConfigGuardRailError::WildcardInKeySegment {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}
