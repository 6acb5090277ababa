use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

use super::container_config::{ContainerConfig, PartialContainerConfig, CONFIG_FILE_NAME, ENV_PREFIX};

/// Configuration loader responsible for loading config from files and environment
#[derive(Debug, Default)]
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
    env_override: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Create a new config loader reading the process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config loader with a fixed environment (for testing)
    pub fn with_env(env_map: HashMap<String, String>) -> Self {
        Self {
            base_path: None,
            env_override: Some(env_map),
        }
    }

    /// Set the directory searched for the config file
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Load `wirebox.toml` from the base path (current directory by default)
    pub fn load_config(&self) -> Result<ContainerConfig, ConfigError> {
        let path = match &self.base_path {
            Some(base) => base.join(CONFIG_FILE_NAME),
            None => PathBuf::from(CONFIG_FILE_NAME),
        };
        self.load_file(path)
    }

    /// Load configuration from a TOML file; a missing file falls back to defaults
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ContainerConfig, ConfigError> {
        let path = path.as_ref();
        let partial = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| ConfigError::FileRead(path.to_string_lossy().to_string(), e))?;
            self.parse_partial(&content, &path.to_string_lossy())?
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            PartialContainerConfig::default()
        };

        ContainerConfig::from_partial_and_env(partial, &self.collect_env_vars())
    }

    /// Load configuration from TOML text
    pub fn load_str(&self, content: &str) -> Result<ContainerConfig, ConfigError> {
        let partial = self.parse_partial(content, "<inline>")?;
        ContainerConfig::from_partial_and_env(partial, &self.collect_env_vars())
    }

    /// Load configuration from environment only
    pub fn load_env(&self) -> Result<ContainerConfig, ConfigError> {
        ContainerConfig::from_partial_and_env(PartialContainerConfig::default(), &self.collect_env_vars())
    }

    fn parse_partial(&self, content: &str, origin: &str) -> Result<PartialContainerConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(origin.to_string(), e))
    }

    /// Collect relevant environment variables
    fn collect_env_vars(&self) -> HashMap<String, String> {
        match &self.env_override {
            Some(env_map) => env_map.clone(),
            None => env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 12\ntrace_resolution = true").unwrap();

        let config = ConfigLoader::with_env(HashMap::new()).load_file(file.path()).unwrap();
        assert_eq!(config.max_depth, 12);
        assert!(config.trace_resolution);
        assert!(config.collect_stats);
    }

    #[test]
    fn test_load_config_from_base_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "collect_stats = false").unwrap();

        let config = ConfigLoader::with_env(HashMap::new())
            .with_base_path(dir.path())
            .load_config()
            .unwrap();
        assert!(!config.collect_stats);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::with_env(HashMap::new())
            .load_file(dir.path().join("absent.toml"))
            .unwrap();
        assert_eq!(config, ContainerConfig::default());
    }

    #[test]
    fn test_malformed_toml() {
        let err = ConfigLoader::with_env(HashMap::new())
            .load_str("max_depth = \"deep\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(..)));
    }

    #[test]
    fn test_env_applies_over_inline() {
        let mut env_map = HashMap::new();
        env_map.insert("WIREBOX_COLLECT_STATS".to_string(), "false".to_string());

        let config = ConfigLoader::with_env(env_map).load_str("collect_stats = true").unwrap();
        assert!(!config.collect_stats);
    }
}
