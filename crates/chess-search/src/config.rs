//! Search configuration.

use serde::Deserialize;

/// Search settings.
///
/// Loaded from the `[search]` table of a TOML file; missing keys take their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to search from the root.
    pub depth: u32,
    /// Score mate and stalemate at the horizon instead of using the static
    /// evaluation there.
    pub terminal_at_horizon: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 3,
            terminal_at_horizon: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, 3);
        assert!(!config.terminal_at_horizon);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SearchConfig = toml::from_str("depth = 2").unwrap();
        assert_eq!(config.depth, 2);
        assert!(!config.terminal_at_horizon);

        let config: SearchConfig = toml::from_str("terminal_at_horizon = true").unwrap();
        assert_eq!(config.depth, 3);
        assert!(config.terminal_at_horizon);
    }
}
