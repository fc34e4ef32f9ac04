use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;

/// Tuning knobs for the depth-first search, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Hard cap on the number of candidates popped from the work list.
    pub max_iterations: u64,
    /// Emit a progress event every this many iterations.
    pub progress_interval: u64,
    /// Skip boards already pushed onto the work list.
    ///
    /// Cuts the search drastically but may change which solution is found first.
    pub prune_revisited: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: 10_000_000,
            progress_interval: 50_000,
            prune_revisited: false,
        }
    }
}

impl SearchConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Validation(
                "max_iterations must be > 0".into(),
            ));
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::Validation(
                "progress_interval must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_tuning() {
        let config = SearchConfig::default();
        assert_eq!(config.max_iterations, 10_000_000);
        assert_eq!(config.progress_interval, 50_000);
        assert!(!config.prune_revisited);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SearchConfig::from_toml_str("max_iterations = 2000\n").unwrap();
        assert_eq!(config.max_iterations, 2000);
        assert_eq!(config.progress_interval, 50_000);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SearchConfig::from_toml_str("").unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = SearchConfig::from_toml_str("progress_interval = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "config validation error: progress_interval must be > 0"
        );

        let err = SearchConfig::from_toml_str("max_iterations = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = SearchConfig::from_toml_str("max_iterations = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = Path::new("definitely/not/here/marbles.toml");
        assert_eq!(SearchConfig::load_or_default(path).unwrap(), SearchConfig::default());
        assert!(matches!(
            SearchConfig::load(path),
            Err(ConfigError::FileRead { .. })
        ));
    }
}
