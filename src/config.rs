//! Container configuration.
//!
//! Settings can be built in code, read from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::env;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ContainerConfig::max_depth`]
pub const ENV_MAX_DEPTH: &str = "MINI_IOC_MAX_DEPTH";
/// Environment variable overriding [`ContainerConfig::duplicate_policy`]
pub const ENV_DUPLICATE_POLICY: &str = "MINI_IOC_DUPLICATE_POLICY";

const DEFAULT_MAX_DEPTH: usize = 1024;

/// What `register` does when the requested type already has a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DuplicatePolicy {
    /// Last registration wins; a warning is logged
    #[default]
    Replace,
    /// Fail with `DiError::DuplicateDefinition`
    Reject,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Replace => f.write_str("replace"),
            DuplicatePolicy::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(DuplicatePolicy::Replace),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(ConfigError::InvalidValue {
                key: ENV_DUPLICATE_POLICY,
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[cfg(feature = "config")]
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Container settings
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{Container, ContainerConfig, DuplicatePolicy};
///
/// let config = ContainerConfig::default()
///     .with_max_depth(64)
///     .with_duplicate_policy(DuplicatePolicy::Reject);
///
/// let container = Container::with_config(config);
/// assert_eq!(container.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Longest dependency chain resolved before failing with `DepthExceeded`
    pub max_depth: usize,
    /// Re-registration behaviour
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl ContainerConfig {
    /// Sets the depth limit. Zero would forbid every bean, so it is raised to one.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Defaults overridden by `MINI_IOC_MAX_DEPTH` and `MINI_IOC_DUPLICATE_POLICY`.
    ///
    /// Unset variables keep their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_MAX_DEPTH) {
            config.max_depth = match raw.trim().parse::<usize>() {
                Ok(depth) => checked_depth(ENV_MAX_DEPTH, depth)?,
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_MAX_DEPTH,
                        value: raw,
                    })
                }
            };
        }

        if let Ok(raw) = env::var(ENV_DUPLICATE_POLICY) {
            config.duplicate_policy = raw.parse()?;
        }

        Ok(config)
    }

    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// A `max_depth` of zero is rejected like it is from the environment.
    ///
    /// ```rust
    /// # #[cfg(feature = "config")]
    /// # {
    /// use mini_ioc::{ContainerConfig, DuplicatePolicy};
    ///
    /// let config = ContainerConfig::from_json_str(r#"{ "duplicate_policy": "reject" }"#).unwrap();
    /// assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    /// assert_eq!(config.max_depth, 1024);
    /// # }
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        checked_depth("max_depth", config.max_depth)?;
        Ok(config)
    }
}

fn checked_depth(key: &'static str, depth: usize) -> Result<usize, ConfigError> {
    if depth == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: depth.to_string(),
        });
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_policy_parses_case_insensitively() {
        assert_eq!("Reject".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Reject);
        assert_eq!(" replace ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Replace);
        assert!("sometimes".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn defaults() {
        let config = ContainerConfig::default();
        assert_eq!(config.max_depth, 1024);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
    }

    #[test]
    fn zero_depth_is_never_accepted() {
        assert_eq!(ContainerConfig::default().with_max_depth(0).max_depth, 1);
        assert_eq!(ContainerConfig::default().with_max_depth(5).max_depth, 5);
        assert!(matches!(
            checked_depth(ENV_MAX_DEPTH, 0),
            Err(ConfigError::InvalidValue { key: ENV_MAX_DEPTH, .. })
        ));
    }
}
