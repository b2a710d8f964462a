//! # dmt-cli — Data Model Tree Command-Line Interface
//!
//! The `dmt` binary exposes every tree engine operation over descriptor files
//! (`.json`, `.yaml`, `.yml`).
//!
//! ## Subcommands
//!
//! - `dmt validate <FILE>...` — build each file, list every violation.
//! - `dmt example <FILE> [--pretty]` — example message.
//! - `dmt paths <FILE>` — the path index.
//! - `dmt lookup <FILE> <PATH>` — type at a path.
//! - `dmt match <FILE> --pattern <FILE> [--root <NAME>]` — subtree matches.
//! - `dmt leaves <FILE> --pattern <FILE> [--root <NAME>]` — leaf path matches.
//! - `dmt schema <FILE>` — JSON Schema of the messages.
//!
//! ## Exit Codes
//!
//! `0` success, `1` schema rejected or empty result, `2` operational error.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `dmt-tree`; no tree logic here.

pub mod inspect;
pub mod load;
pub mod matching;
pub mod validate;

use dmt_core::{ConfigError, MatchLimits};

/// Exit code for a rejected schema or an empty result.
pub const EXIT_REJECTED: u8 = 1;

/// Exit code for I/O, parse and configuration errors.
pub const EXIT_ERROR: u8 = 2;

/// Matcher limits from the environment, overridden by explicit flags.
pub fn resolve_limits(
    max_fan_out: Option<usize>,
    max_pattern_nodes: Option<usize>,
) -> Result<MatchLimits, ConfigError> {
    let mut limits = MatchLimits::from_env()?;
    if let Some(n) = max_fan_out {
        limits.max_fan_out = n;
    }
    if let Some(n) = max_pattern_nodes {
        limits.max_pattern_nodes = n;
    }
    Ok(limits)
}
