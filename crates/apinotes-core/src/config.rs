use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{ApiNotesError, Result};
use crate::notes::VersionTuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrictLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

impl Default for StrictLevel {
    fn default() -> Self {
        StrictLevel::Warning
    }
}

impl StrictLevel {
    /// One step stricter; `Off` stays off
    pub fn escalated(self) -> Self {
        match self {
            StrictLevel::Off => StrictLevel::Off,
            StrictLevel::Warning | StrictLevel::Error => StrictLevel::Error,
        }
    }
}

/// Options that control how notes files are discovered and loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotesOptions {
    /// Look for notes next to headers reached through inclusion (default: true)
    #[serde(default = "default_true")]
    pub implicit_api_notes: bool,

    /// Swift version used to select versioned notes
    #[serde(default)]
    pub swift_version: Option<String>,

    /// Directories searched for `<Module>.apinotes` when loading the current module
    #[serde(default)]
    pub module_search_paths: Vec<PathBuf>,

    /// Look beside the current module before the search paths (default: true)
    #[serde(default = "default_true")]
    pub search_in_module: bool,

    /// How to report private notes files whose name lacks `_private` (default: warning)
    #[serde(default)]
    pub private_notes_naming: StrictLevel,

    /// Pretty-print diagnostics (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ApiNotesOptions {
    fn default() -> Self {
        Self {
            implicit_api_notes: true,
            swift_version: None,
            module_search_paths: Vec::new(),
            search_in_module: true,
            private_notes_naming: StrictLevel::Warning,
            pretty: true,
        }
    }
}

impl ApiNotesOptions {
    pub fn parsed_swift_version(&self) -> Result<Option<VersionTuple>> {
        self.swift_version
            .as_deref()
            .map(|v| v.parse::<VersionTuple>())
            .transpose()
    }
}

/// Command-line flags that take precedence over a config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub implicit_api_notes: Option<bool>,
    pub swift_version: Option<String>,
    pub module_search_paths: Option<Vec<PathBuf>>,
    pub search_in_module: Option<bool>,
    pub private_notes_naming: Option<StrictLevel>,
    pub pretty: Option<bool>,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotesConfig {
    #[serde(default)]
    pub api_notes_options: ApiNotesOptions,
}

impl ApiNotesConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ApiNotesError::ConfigError(e.to_string())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| ApiNotesError::ConfigError(e.to_string())),
            other => Err(ApiNotesError::UnsupportedConfigFormat(
                other.unwrap_or("").to_string(),
            )),
        }
    }

    /// Create a default configuration and write it to a YAML file
    pub fn init_file(path: &Path) -> Result<()> {
        let config = ApiNotesConfig::default();
        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| ApiNotesError::ConfigError(e.to_string()))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Merge command-line overrides into this configuration
    pub fn merge_with_cli(&mut self, overrides: CliOverrides) {
        let options = &mut self.api_notes_options;
        if let Some(implicit) = overrides.implicit_api_notes {
            options.implicit_api_notes = implicit;
        }
        if let Some(version) = overrides.swift_version {
            options.swift_version = Some(version);
        }
        if let Some(paths) = overrides.module_search_paths {
            options.module_search_paths = paths;
        }
        if let Some(search_in_module) = overrides.search_in_module {
            options.search_in_module = search_in_module;
        }
        if let Some(naming) = overrides.private_notes_naming {
            options.private_notes_naming = naming;
        }
        if let Some(pretty) = overrides.pretty {
            options.pretty = pretty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ApiNotesConfig::default();
        assert!(config.api_notes_options.implicit_api_notes);
        assert!(config.api_notes_options.search_in_module);
        assert_eq!(
            config.api_notes_options.private_notes_naming,
            StrictLevel::Warning
        );
    }

    #[test]
    fn test_deserialize_json_config() {
        let json = r#"{
            "apiNotesOptions": {
                "implicitApiNotes": false,
                "swiftVersion": "5.9",
                "privateNotesNaming": "error"
            }
        }"#;
        let config: ApiNotesConfig = serde_json::from_str(json).unwrap();
        let options = &config.api_notes_options;
        assert!(!options.implicit_api_notes);
        assert_eq!(options.private_notes_naming, StrictLevel::Error);
        assert_eq!(
            options.parsed_swift_version().unwrap(),
            Some(VersionTuple::new(5, Some(9)))
        );
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apinotes.yaml");

        ApiNotesConfig::init_file(&path).unwrap();
        let config = ApiNotesConfig::from_file(&path).unwrap();
        assert_eq!(config, ApiNotesConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apinotes.toml");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            ApiNotesConfig::from_file(&path),
            Err(ApiNotesError::UnsupportedConfigFormat(_))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = ApiNotesConfig::default();
        config.merge_with_cli(CliOverrides {
            implicit_api_notes: Some(false),
            module_search_paths: Some(vec![PathBuf::from("/notes")]),
            ..Default::default()
        });

        assert!(!config.api_notes_options.implicit_api_notes);
        assert_eq!(
            config.api_notes_options.module_search_paths,
            vec![PathBuf::from("/notes")]
        );
        assert!(config.api_notes_options.search_in_module);
    }

    #[test]
    fn test_escalated() {
        assert_eq!(StrictLevel::Warning.escalated(), StrictLevel::Error);
        assert_eq!(StrictLevel::Off.escalated(), StrictLevel::Off);
    }
}
