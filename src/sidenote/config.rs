//! Configuration loading.
//!
//! `defaults/sidenote.default.toml` is embedded into the crate so that the documented
//! defaults and runtime behavior stay in sync. Callers layer their own files and
//! overrides on top of those defaults via [`ConfigLoader`] before deserializing into
//! [`SidenoteConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/sidenote.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SidenoteConfig {
    pub arrange: ArrangeConfig,
    pub lookup: LookupConfig,
}

/// Knobs of the section arranger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArrangeConfig {
    pub attach_adjacent_comments: bool,
}

/// Where docstrings of other namespaces are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupConfig {
    pub default_namespace: String,
    #[serde(default)]
    pub source_paths: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            default_namespace: "user".to_string(),
            source_paths: Vec::new(),
            extensions: vec!["clj".to_string(), "cljc".to_string(), "cljs".to_string()],
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<SidenoteConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<SidenoteConfig, ConfigError> {
    ConfigLoader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.arrange.attach_adjacent_comments);
        assert_eq!(config.lookup.default_namespace, "user");
        assert!(config.lookup.source_paths.is_empty());
        assert_eq!(config.lookup.extensions, vec!["clj", "cljc", "cljs"]);
    }

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, SidenoteConfig::default());
    }

    #[test]
    fn supports_overrides() {
        let config = ConfigLoader::new()
            .set_override("arrange.attach_adjacent_comments", true)
            .expect("override to apply")
            .set_override("lookup.source_paths", vec!["src", "test"])
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.arrange.attach_adjacent_comments);
        assert_eq!(config.lookup.source_paths, vec!["src", "test"]);
    }

    #[test]
    fn layers_user_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sidenote.toml");
        fs::write(&path, "[lookup]\ndefault_namespace = \"scratch\"\n").expect("write config");

        let config = ConfigLoader::new()
            .with_file(&path)
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .expect("config to build");
        assert_eq!(config.lookup.default_namespace, "scratch");
        assert_eq!(config.lookup.extensions, vec!["clj", "cljc", "cljs"]);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = ConfigLoader::new()
            .with_file(dir.path().join("absent.toml"))
            .build();
        assert!(result.is_err());
    }
}
