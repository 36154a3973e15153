//! Reference data configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Reference data configuration
///
/// Each path overrides one of the seed files compiled into the binary.
/// Unset paths fall back to the built-in seeds, so a stock deployment
/// needs no files on disk at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceConfig {
    /// Treatment template definitions (YAML)
    #[serde(default)]
    pub templates_path: Option<PathBuf>,

    /// Stage reference table rows (YAML)
    #[serde(default)]
    pub stage_reference_path: Option<PathBuf>,

    /// Patient-facing content blocks (YAML)
    #[serde(default)]
    pub content_blocks_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_config_defaults_to_builtin() {
        let config = ReferenceConfig::default();
        assert!(config.templates_path.is_none());
        assert!(config.stage_reference_path.is_none());
        assert!(config.content_blocks_path.is_none());
    }

    #[test]
    fn test_reference_config_deserialization() {
        let json = r#"{
            "templates_path": "/etc/carepath/templates.yaml",
            "content_blocks_path": "/etc/carepath/content.yaml"
        }"#;

        let config: ReferenceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.templates_path,
            Some(PathBuf::from("/etc/carepath/templates.yaml"))
        );
        assert!(config.stage_reference_path.is_none());
        assert_eq!(
            config.content_blocks_path,
            Some(PathBuf::from("/etc/carepath/content.yaml"))
        );
    }
}
