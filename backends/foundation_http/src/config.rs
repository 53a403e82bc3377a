//! Settings for turning a server environment into a request.
//!
//! Settings live in a TOML file:
//!
//! ```toml
//! default_protocol_version = "1.1"
//! max_body_size = 1048576
//! ```

use derive_more::From;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, From)]
pub enum ConfigError {
    #[from(ignore)]
    IOError(std::io::Error),

    #[from(ignore)]
    DeserializationFailed(toml::de::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::DeserializationFailed(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Reads and deserializes a TOML file.
///
/// # Errors
///
/// Returns `IOError` when the file cannot be read and
/// `DeserializationFailed` when its content does not match `T`.
pub fn from_path<T, V>(target: V) -> ConfigResult<T>
where
    T: DeserializeOwned,
    V: Into<std::path::PathBuf>,
{
    let target_path = target.into();
    let config_content = std::fs::read_to_string(target_path)?;
    let config_obj: T = toml::from_str(&config_content)?;
    Ok(config_obj)
}

pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerRequestConfig {
    /// Used when the environment carries no `SERVER_PROTOCOL`.
    pub default_protocol_version: String,

    /// Largest body accepted while draining the input, unlimited when unset.
    pub max_body_size: Option<usize>,
}

impl Default for ServerRequestConfig {
    fn default() -> Self {
        Self {
            default_protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            max_body_size: None,
        }
    }
}

impl ServerRequestConfig {
    /// Loads the settings from a TOML file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// See [`from_path`].
    pub fn from_path<V: Into<std::path::PathBuf>>(target: V) -> ConfigResult<Self> {
        from_path(target)
    }

    /// Parses the settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `DeserializationFailed` for malformed TOML or mistyped values.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerRequestConfig::default();
        assert_eq!(config.default_protocol_version, "1.1");
        assert_eq!(config.max_body_size, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerRequestConfig::from_toml("max_body_size = 1024\n").unwrap();
        assert_eq!(config.default_protocol_version, "1.1");
        assert_eq!(config.max_body_size, Some(1024));
    }

    #[test]
    fn test_invalid_toml() {
        let result = ServerRequestConfig::from_toml("max_body_size = \"lots\"\n");
        assert!(matches!(result, Err(ConfigError::DeserializationFailed(_))));
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!(
            "foundation_http_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "default_protocol_version = \"1.0\"\n").unwrap();

        let config = ServerRequestConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.default_protocol_version, "1.0");
        assert_eq!(config.max_body_size, None);
    }

    #[test]
    fn test_missing_file() {
        let result = ServerRequestConfig::from_path("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::IOError(_))));
    }
}
