//=====================================================
// File: config.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint runtime configuration
// Objective: Load optional TOML settings for the interpreter and CLI, with
//            every field defaulted so a missing file means stock behaviour
//=====================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlintConfig {
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

/// Interpreter behaviour knobs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Seed for `random`; unseeded runs draw from OS entropy.
    pub random_seed: Option<u64>,
    /// Print every non-empty top-level result after a run.
    pub print_results: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl GlintConfig {
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source, path)
    }

    /// `<config dir>/glint/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glint").join(CONFIG_FILE_NAME))
    }

    //Function: resolve
    //Purpose: Load an explicit config, else the per-user file if present, else defaults
    //Inputs: explicit: Option<&Path>
    //Returns: Result<(GlintConfig, Option<PathBuf>), ConfigError>
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        match Self::default_path().filter(|path| path.is_file()) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = GlintConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, GlintConfig::default());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.runtime.random_seed, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[runtime]\nrandom_seed = 42\nprint_results = true\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();
        let config = GlintConfig::load(file.path()).unwrap();
        assert_eq!(config.runtime.random_seed, Some(42));
        assert!(config.runtime.print_results);
        assert_eq!(config.logging.level, "debug");

        let (resolved, path) = GlintConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(resolved, config);
        assert_eq!(path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = GlintConfig::from_toml_str("[runtime]\nseed = 1", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config bad.toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlintConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
