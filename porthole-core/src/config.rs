//! Serving configuration.
//!
//! The serving port resolves in priority order: an explicit runtime override
//! beats the role default (editor 8890, server 8891, client 8892).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use porthole_shared::ProcessRole;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortholeConfig {
    /// Explicit serving port. Overrides the role default when set.
    pub port: Option<u16>,
    /// Role of the hosting process, picking the default port.
    pub role: ProcessRole,
    /// Dwell seconds before the control token rotates.
    pub control_dwell: Option<f64>,
}

impl PortholeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// The port this process serves on.
    pub fn resolve_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.role.default_port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_default_port() {
        let config = PortholeConfig {
            role: ProcessRole::Server,
            ..Default::default()
        };
        assert_eq!(config.resolve_port(), 8891);
    }

    #[test]
    fn test_override_beats_role_default() {
        let config = PortholeConfig {
            port: Some(9000),
            role: ProcessRole::Editor,
            ..Default::default()
        };
        assert_eq!(config.resolve_port(), 9000);
    }

    #[test]
    fn test_parse_toml() {
        let config = PortholeConfig::from_toml_str(
            r#"
            port = 9100
            role = "editor"
            control_dwell = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(config.port, Some(9100));
        assert_eq!(config.role, ProcessRole::Editor);
        assert_eq!(config.control_dwell, Some(5.0));
        assert_eq!(config.resolve_port(), 9100);
    }

    #[test]
    fn test_empty_config_defaults_to_client() {
        let config = PortholeConfig::from_toml_str("").unwrap();
        assert_eq!(config.role, ProcessRole::Client);
        assert_eq!(config.resolve_port(), 8892);
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(PortholeConfig::from_toml_str("port = \"not a number\"").is_err());
    }
}
