//! # Router Module
//!
//! The router decides whether a navigation should produce a view transition,
//! and with which route names, class and parameters.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling named route templates (`/app/song/:song_id`) into URL matchers
//! - Expanding rule shorthands (`with`, `between`) into directional rules
//! - Matching navigations against the rules, last-declared rule first
//! - Extracting path and query parameters from both sides of the navigation
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: When a configuration is loaded, route templates are converted into
//!    anchored regex patterns per URL component, and rules naming unknown routes are rejected.
//!
//! 2. **Matching**: For each navigation, rules are tested in reverse declaration order.
//!    The first rule whose navigation type and both route patterns match wins.
//!
//! ## Example
//!
//! ```rust
//! use velvette::config::{Config, RuleConfig};
//! use velvette::router::{NavRouter, NavigationDescription, NavigationType};
//!
//! let config = Config::new()
//!     .route("home", "/")
//!     .route("song", "/song/:id")
//!     .rule(RuleConfig::between("home", "song").class("expand"));
//! let router = NavRouter::new(&config).unwrap();
//!
//! let nav = NavigationDescription::new(
//!     "https://example.com/",
//!     "https://example.com/song/7",
//!     NavigationType::Push,
//! ).unwrap();
//! let result = router.find_matching_nav(&nav).unwrap();
//! assert_eq!(result.params["id"], "7");
//! assert_eq!(result.class.as_deref(), Some("expand"));
//! ```

mod core;
mod navigation;
mod pattern;
#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

/// Named parameters captured from route patterns and capture selectors.
pub type Params = BTreeMap<String, String>;

pub use self::core::{MatchResult, NavRouter, NavRule};
pub use navigation::{
    Activation, HistoryEntry, NavigateEvent, NavigationDescription, NavigationType, RuleKind,
    UnknownNavigationType,
};
pub use pattern::{PatternError, UrlPattern};
