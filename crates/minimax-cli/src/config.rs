//! Configuration file loading for the command-line front end.
//!
//! Settings come from `minimax.toml` in the current directory when present.
//! Every table and key is optional.

use chess_engine::RulesConfig;
use chess_search::SearchConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// External UCI engine settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UciConfig {
    /// Engine executable, looked up in `PATH` if not a path.
    pub path: PathBuf,
    /// Depth passed to `go depth`.
    pub depth: u32,
}

impl Default for UciConfig {
    fn default() -> Self {
        UciConfig {
            path: PathBuf::from("stockfish"),
            depth: 1,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub search: SearchConfig,
    pub rules: RulesConfig,
    pub uci: UciConfig,
}

impl CliConfig {
    /// Loads configuration from `path`, or defaults if the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("minimax.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = CliConfig::load(Path::new("/nonexistent/minimax.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.search.depth, 3);
        assert_eq!(config.rules.repetition_limit, 3);
        assert_eq!(config.uci.path, PathBuf::from("stockfish"));
    }

    #[test]
    fn parses_partial_tables() {
        let config: CliConfig = toml::from_str(
            r#"
            [search]
            depth = 4

            [rules]
            fifty_move_limit = 150

            [uci]
            path = "/usr/games/stockfish"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.depth, 4);
        assert!(!config.search.terminal_at_horizon);
        assert_eq!(config.rules.fifty_move_limit, 150);
        assert_eq!(config.rules.repetition_limit, 3);
        assert_eq!(config.uci.path, PathBuf::from("/usr/games/stockfish"));
        assert_eq!(config.uci.depth, 1);
    }

    #[test]
    fn rejects_invalid_toml() {
        let result: Result<CliConfig, _> = toml::from_str("[search\ndepth = ");
        assert!(result.is_err());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::ReadError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
