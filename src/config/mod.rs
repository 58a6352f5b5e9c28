//! Declarative configuration: routes, rules, captures and styles.
//!
//! A [`Config`] is plain data, loaded from YAML, JSON or TOML or built in code.
//! [`CompiledConfig::compile`] turns it into the immutable form the
//! choreographer runs against.

mod build;
mod error;
mod load;
mod ordered;
mod types;

pub use build::CompiledConfig;
pub use error::ConfigError;
pub use load::{load_config, parse_config, ConfigFormat};
pub use ordered::OrderedMap;
pub use types::{Config, CssValue, RuleConfig, StyleDeclaration, WithRoutes};
