//! CLI configuration file (`--config <path.yaml>`).

use anyhow::{Context, Result};
use sborcodec_core::ParseOptions;
use sborcodec_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every field is optional in the file; omitted ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub log: LogConfig,
    pub parse: ParseOptions,
    /// Directory scanned for schema definitions when a command has no `--schema-dir`
    pub schema_dir: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            parse: ParseOptions::default(),
            schema_dir: PathBuf::from("./schemas"),
        }
    }
}

impl CliConfig {
    /// Read the config file, or fall back to defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file '{}'", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parse config file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_argument_gives_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.parse.max_depth, 64);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sborcodec.yaml");
        std::fs::write(&path, "parse:\n  max_depth: 8\nlog:\n  json: true\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.parse.max_depth, 8);
        assert!(config.log.json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/sborcodec.yaml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sborcodec.yaml"));
    }
}
