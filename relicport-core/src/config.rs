//! Scanner configuration: which tool produced a snapshot and which versions
//! of it are current.
//!
//! Supports TOML configuration files like:
//! ```toml
//! name = "Kel-Z HSR Scanner"
//! source = "HSR-Scanner"
//! latest_output_version = 4
//! latest_build_version = "v1.0.0"
//! releases = "https://github.com/kel-z/HSR-Scanner/releases"
//! speed_verified = false
//! ```

use crate::error::{ImportError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScannerConfig {
    pub name: String,
    /// Signature every snapshot from this scanner carries in `source`.
    pub source: String,
    pub latest_output_version: i64,
    pub latest_build_version: String,
    /// Where users can fetch an up-to-date scanner build.
    #[serde(default)]
    pub releases: String,
    /// Whether relic speed substats from this scanner are exact. Stamped onto
    /// every imported relic.
    #[serde(default)]
    pub speed_verified: bool,
}

impl ScannerConfig {
    pub const PRESET_NAMES: [&'static str; 2] = ["kelz", "reliquary"];

    /// Load scanner configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read scanner config from {:?}: {}", path, e),
            ))
        })?;

        Self::from_str(&content)
    }

    /// Parse scanner configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ImportError::Config(format!("Failed to parse scanner config TOML: {}", e))
        })
    }

    /// Kel-Z HSR Scanner, which reads values from screenshots.
    pub fn kelz() -> Self {
        Self {
            name: "Kel-Z HSR Scanner".to_string(),
            source: "HSR-Scanner".to_string(),
            latest_output_version: 4,
            latest_build_version: "v1.0.0".to_string(),
            releases: "https://github.com/kel-z/HSR-Scanner/releases".to_string(),
            speed_verified: false,
        }
    }

    /// Reliquary Archiver, which reads game packets and so reports exact
    /// speed values.
    pub fn reliquary() -> Self {
        Self {
            name: "Reliquary Archiver".to_string(),
            source: "reliquary_archiver".to_string(),
            latest_output_version: 4,
            latest_build_version: "v0.1.0".to_string(),
            releases: "https://github.com/IceDynamix/reliquary-archiver/releases".to_string(),
            speed_verified: true,
        }
    }

    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kelz" => Ok(Self::kelz()),
            "reliquary" => Ok(Self::reliquary()),
            other => Err(ImportError::Config(format!(
                "Unknown scanner preset '{}', expected one of {}",
                other,
                Self::PRESET_NAMES.join(", ")
            ))),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::kelz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_scanner_config() {
        let toml = r#"
name = "Test Scanner"
source = "test_scanner"
latest_output_version = 4
latest_build_version = "v2.1.0"
releases = "https://example.invalid/releases"
speed_verified = true
"#;

        let config = ScannerConfig::from_str(toml).unwrap();
        assert_eq!(config.source, "test_scanner");
        assert_eq!(config.latest_output_version, 4);
        assert_eq!(config.latest_build_version, "v2.1.0");
        assert!(config.speed_verified);
    }

    #[test]
    fn test_optional_fields_default() {
        let toml = r#"
name = "Minimal"
source = "minimal"
latest_output_version = 3
latest_build_version = "0.0.1"
"#;

        let config = ScannerConfig::from_str(toml).unwrap();
        assert_eq!(config.releases, "");
        assert!(!config.speed_verified);
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let result = ScannerConfig::from_str("name = \"x\"");
        assert!(matches!(result, Err(ImportError::Config(_))));
    }

    #[test]
    fn test_presets() {
        assert_eq!(ScannerConfig::preset("kelz").unwrap().source, "HSR-Scanner");
        assert!(ScannerConfig::preset("Reliquary").unwrap().speed_verified);
        assert!(ScannerConfig::preset("unknown").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "name = \"File\"\nsource = \"file_scanner\"\nlatest_output_version = 4\nlatest_build_version = \"1.0.0\"\n"
        )
        .unwrap();

        let config = ScannerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.source, "file_scanner");
    }
}
