//! Matcher limits configuration.
//!
//! The subtree matcher enumerates every sibling permutation and is
//! exponential in fan-out. It enforces no limit itself; callers bound it by
//! checking trees and patterns against [`MatchLimits`] first. Defaults suit
//! typical IoT payloads. Override via environment variables or explicit
//! construction.

/// Default maximum number of children of any node considered by the matcher.
pub const DEFAULT_MAX_FAN_OUT: usize = 6;

/// Default maximum number of nodes in a pattern subtree.
pub const DEFAULT_MAX_PATTERN_NODES: usize = 32;

/// Bounds a caller applies before invoking the subtree matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    /// Largest sibling group permitted in either the searched tree or the pattern.
    pub max_fan_out: usize,
    /// Largest pattern subtree permitted.
    pub max_pattern_nodes: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_fan_out: DEFAULT_MAX_FAN_OUT,
            max_pattern_nodes: DEFAULT_MAX_PATTERN_NODES,
        }
    }
}

impl MatchLimits {
    /// Load limits from environment variables.
    ///
    /// Variables:
    /// - `DMT_MAX_FAN_OUT` (default: 6)
    /// - `DMT_MAX_PATTERN_NODES` (default: 32)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_fan_out: env_usize("DMT_MAX_FAN_OUT", DEFAULT_MAX_FAN_OUT)?,
            max_pattern_nodes: env_usize("DMT_MAX_PATTERN_NODES", DEFAULT_MAX_PATTERN_NODES)?,
        })
    }

    /// True if a search with these sizes stays within the limits.
    pub fn admits(&self, tree_fan_out: usize, pattern_fan_out: usize, pattern_nodes: usize) -> bool {
        self.check(tree_fan_out, pattern_fan_out, pattern_nodes).is_ok()
    }

    /// Check sizes against the limits, naming the first one exceeded.
    pub fn check(
        &self,
        tree_fan_out: usize,
        pattern_fan_out: usize,
        pattern_nodes: usize,
    ) -> Result<(), ConfigError> {
        if tree_fan_out > self.max_fan_out {
            return Err(ConfigError::LimitExceeded {
                what: "tree fan-out",
                actual: tree_fan_out,
                limit: self.max_fan_out,
            });
        }
        if pattern_fan_out > self.max_fan_out {
            return Err(ConfigError::LimitExceeded {
                what: "pattern fan-out",
                actual: pattern_fan_out,
                limit: self.max_fan_out,
            });
        }
        if pattern_nodes > self.max_pattern_nodes {
            return Err(ConfigError::LimitExceeded {
                what: "pattern size",
                actual: pattern_nodes,
                limit: self.max_pattern_nodes,
            });
        }
        Ok(())
    }
}

fn env_usize(var: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => parse_positive(var, &raw),
    }
}

fn parse_positive(var: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue(var.to_string(), raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?} (expected a positive integer)")]
    InvalidValue(String, String),
    #[error("{what} {actual} exceeds the configured limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        actual: usize,
        limit: usize,
    },
}
