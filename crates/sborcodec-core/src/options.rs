//! Parse-time configuration.

use serde::{Deserialize, Serialize};

/// Options for [`Schema::safe_parse_with`](crate::schema::Schema::safe_parse_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Deepest tree accepted before parsing starts. Parsing recurses once
    /// per level, so this bounds stack use.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Matches the ledger's own SBOR nesting limit.
fn default_max_depth() -> usize {
    64
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl ParseOptions {
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Controls how a batch parse reacts to individual failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Drop values that fail to parse.
    #[default]
    Skip,
    /// Collect parse errors alongside successes and return both at the end.
    Collect,
    /// Abort the entire batch on the first error.
    Throw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_config() {
        let opts: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.max_depth, 64);
        assert_eq!(opts, ParseOptions::default());
    }

    #[test]
    fn error_mode_is_lowercase() {
        let mode: ErrorMode = serde_json::from_str("\"collect\"").unwrap();
        assert_eq!(mode, ErrorMode::Collect);
    }
}
