//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, settings can live in a config file:
//!
//! ```toml
//! # binpak.toml
//! [session]
//! require_single_row = true
//! channels = ["x", "y", "z"]
//! atomic_output = true
//!
//! [transform]
//! kind = "gaussian"
//! sigma = 2.0
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use binpak::session::SessionConfig;
use binpak::transform::TransformSpec;

/// Root configuration structure for binpak.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session settings.
    pub session: SessionConfig,

    /// Transform applied to the selected channels.
    pub transform: TransformSpec,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binpak::session::ChannelSelection;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [session]
            require_single_row = false
            channels = ["y"]
            atomic_output = false

            [transform]
            kind = "threshold"
            threshold = 0.25
        "#;

        let config = Config::from_str(toml).unwrap();
        assert!(!config.session.require_single_row);
        assert_eq!(config.session.channels, ChannelSelection::y_only());
        assert!(!config.session.atomic_output);
        assert_eq!(
            config.transform,
            TransformSpec::Threshold { threshold: 0.25 }
        );
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [transform]
            kind = "gaussian"
            sigma = 5.0
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(
            config.transform,
            TransformSpec::Gaussian {
                sigma: 5.0,
                truncate: 4.0
            }
        );
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.transform, TransformSpec::default());
    }

    #[test]
    fn test_unknown_transform_is_rejected() {
        assert!(Config::from_str("[transform]\nkind = \"fft\"\n").is_err());
    }
}
