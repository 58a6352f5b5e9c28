//! # CLI Module
//!
//! Command-line tools for working on a choreography configuration outside
//! the browser.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Validate a configuration and print the rules in evaluation order, after
//! `with` and `between` shorthands have been expanded:
//!
//! ```bash
//! velvette check --config transitions.yaml
//! ```
//!
//! With `--watch` the command keeps running and prints the rules again after
//! every successful reload. Invalid edits are logged and the previous rules
//! stay in effect.
//!
//! ### `match`
//!
//! Match a single navigation and print the [`MatchResult`](crate::router::MatchResult)
//! as JSON, or `null` when no rule matches:
//!
//! ```bash
//! velvette match --config transitions.yaml \
//!     --from https://example.com/ \
//!     --to https://example.com/song/12
//!
//! velvette match --config transitions.yaml \
//!     --from https://example.com/song/12 \
//!     --to https://example.com/ \
//!     --type traverse --delta -1
//! ```
//!
//! Relative route patterns need a base URL. When the file declares none,
//! `VELVETTE_BASE_URL` is used.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use velvette::cli::{run, Cli};
//! use velvette::runtime_config::RuntimeConfig;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run(&cli, &RuntimeConfig::from_env(), &mut std::io::stdout())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
