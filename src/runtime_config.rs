//! # Runtime Configuration Module
//!
//! Router-wide settings, loaded from environment variables or embedded in a
//! manifest under `settings:`.
//!
//! ## Environment Variables
//!
//! ### `ACTR_PATH_SEPARATOR`
//!
//! Segment separator used by the trie, the glob matcher and namespace prefixes.
//! Must be a single character. Default: `/`
//!
//! ### `ACTR_DEFAULT_STACK`
//!
//! Interceptor stack applied to handlers whose own declaration and namespace
//! declare nothing. Default: unset (empty chain).
//!
//! ### `ACTR_DEFAULT_RESULT`
//!
//! Result name assumed when a handler returns without selecting one.
//! Default: `success`
//!
//! ### `ACTR_SLOW_RESOLVE_US`
//!
//! Resolutions slower than this many microseconds are logged at `warn`.
//! Default: `1000`
//!
//! ## Usage
//!
//! ```rust
//! use actionrouter::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("separator: {}", config.separator);
//! ```

use serde::Deserialize;
use std::env;

/// Default result name when a handler does not pick one.
pub const DEFAULT_RESULT: &str = "success";

/// Router-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Path segment separator
    pub separator: char,
    /// Stack used when neither handler nor namespace declare interceptors
    pub default_stack: Option<String>,
    /// Result name assumed when the handler selects none
    pub default_result: String,
    /// Threshold above which a resolution is reported as slow
    pub slow_resolve_threshold_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            separator: '/',
            default_stack: None,
            default_result: DEFAULT_RESULT.to_string(),
            slow_resolve_threshold_us: 1_000,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to [`RouterConfig::default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let separator = env::var("ACTR_PATH_SEPARATOR")
            .ok()
            .and_then(|val| {
                let mut chars = val.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            })
            .unwrap_or(defaults.separator);

        let default_stack = env::var("ACTR_DEFAULT_STACK")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let default_result = env::var("ACTR_DEFAULT_RESULT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_result);

        let slow_resolve_threshold_us = env::var("ACTR_SLOW_RESOLVE_US")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.slow_resolve_threshold_us);

        RouterConfig {
            separator,
            default_stack,
            default_result,
            slow_resolve_threshold_us,
        }
    }

    /// Builder-style override of the default stack.
    #[must_use]
    pub fn with_default_stack(mut self, stack: impl Into<String>) -> Self {
        self.default_stack = Some(stack.into());
        self
    }

    /// Builder-style override of the separator.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}
