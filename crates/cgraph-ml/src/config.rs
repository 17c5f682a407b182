//! Adapter configuration
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! read_command = "read"
//! check_command = "st"
//! option_policy = "reject"
//! default_version = 1.2
//! ```

use crate::error::{AdapterError, AdapterResult};
use crate::options::OptionPolicy;
use crate::version::GraphVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Adapter settings, every field optional in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Command that loads a circuit file
    #[serde(default = "default_read_command")]
    pub read_command: String,

    /// Structural check issued right after loading
    #[serde(default = "default_check_command")]
    pub check_command: String,

    /// Handling of mixed-case keyword names
    #[serde(default)]
    pub option_policy: OptionPolicy,

    /// Version code used when a caller does not pass one
    #[serde(default)]
    pub default_version: f64,
}

fn default_read_command() -> String {
    "read".to_string()
}

fn default_check_command() -> String {
    "st".to_string()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            read_command: default_read_command(),
            check_command: default_check_command(),
            option_policy: OptionPolicy::default(),
            default_version: 0.0,
        }
    }
}

impl AdapterConfig {
    /// Parse a config file
    pub fn from_path(path: impl AsRef<Path>) -> AdapterResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AdapterError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_str(&contents)
    }

    /// Parse config text and check the default version
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> AdapterResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| AdapterError::Config(e.to_string()))?;
        config.version()?;
        Ok(config)
    }

    /// Decoded default version
    pub fn version(&self) -> AdapterResult<GraphVersion> {
        GraphVersion::from_code(self.default_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::from_str("").unwrap();
        assert_eq!(config, AdapterConfig::default());
        assert_eq!(config.read_command, "read");
        assert_eq!(config.check_command, "st");
        assert_eq!(config.option_policy, OptionPolicy::Skip);
        assert_eq!(config.version().unwrap(), GraphVersion::default());
    }

    #[test]
    fn test_parse_overrides() {
        let config = AdapterConfig::from_str(
            r#"
            read_command = "r"
            option_policy = "reject"
            default_version = 1.2
        "#,
        )
        .unwrap();
        assert_eq!(config.read_command, "r");
        assert_eq!(config.check_command, "st");
        assert_eq!(config.option_policy, OptionPolicy::Reject);
        assert!(config.version().unwrap().has_edge_weights());
    }

    #[test]
    fn test_reject_bad_config() {
        assert!(matches!(
            AdapterConfig::from_str("option_policy = \"maybe\""),
            Err(AdapterError::Config(_))
        ));
        assert!(matches!(
            AdapterConfig::from_str("default_version = 3.5"),
            Err(AdapterError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "check_command = \"strash\"").unwrap();
        let config = AdapterConfig::from_path(file.path()).unwrap();
        assert_eq!(config.check_command, "strash");

        assert!(matches!(
            AdapterConfig::from_path("/nonexistent/cgraph.toml"),
            Err(AdapterError::Config(_))
        ));
    }
}
