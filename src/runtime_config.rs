//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the parts of velvette that are
//! tuned per deployment rather than per route table.
//!
//! ## Environment Variables
//!
//! ### `VELVETTE_MAX_CAPTURE_JOBS`
//!
//! Upper bound on the number of resolution jobs a single capture may spawn.
//! Every `[:attr]` binding in a capture selector fans out into one job per
//! matched element, so a selector such as `li[:a] li[:b] li[:c]` over a large
//! list multiplies quickly. Accepts decimal (`10000`) or hexadecimal
//! (`0x2710`) values.
//!
//! Default: `10000`
//!
//! ### `VELVETTE_BASE_URL`
//!
//! Base URL used to resolve relative route patterns when the configuration
//! file does not declare `base_url` itself. Mostly useful for the CLI, which
//! has no `location` to borrow one from.
//!
//! ## Usage
//!
//! ```rust
//! use velvette::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Capture job limit: {}", config.max_capture_jobs);
//! ```

use std::env;

/// Default number of capture resolution jobs allowed per capture.
pub const DEFAULT_MAX_CAPTURE_JOBS: usize = 10_000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum resolution jobs per capture (default: 10 000)
    pub max_capture_jobs: usize,
    /// Fallback base URL for relative route patterns
    pub base_url: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_capture_jobs: DEFAULT_MAX_CAPTURE_JOBS,
            base_url: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let max_capture_jobs = match env::var("VELVETTE_MAX_CAPTURE_JOBS") {
            Ok(val) => parse_count(&val).unwrap_or(DEFAULT_MAX_CAPTURE_JOBS),
            Err(_) => DEFAULT_MAX_CAPTURE_JOBS,
        };
        let base_url = env::var("VELVETTE_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        RuntimeConfig {
            max_capture_jobs,
            base_url,
        }
    }
}

fn parse_count(val: &str) -> Option<usize> {
    let val = val.trim();
    let parsed = if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    };
    // a zero limit would silently disable every capture
    parsed.filter(|n| *n > 0)
}
