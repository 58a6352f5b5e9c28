use crate::router::PatternError;

/// Error building a [`CompiledConfig`](super::CompiledConfig).
///
/// All of these are detected once, when the configuration is compiled; a
/// compiled configuration never fails at navigation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `base_url` is not an absolute URL
    #[error("invalid base URL `{url}`: {message}")]
    InvalidBaseUrl { url: String, message: String },
    /// A route pattern failed to compile
    #[error("route `{route}` has an invalid pattern: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: PatternError,
    },
    /// A rule names a route missing from `routes`
    #[error("rule #{rule} references unknown route `{route}`")]
    UnknownRoute { rule: usize, route: String },
    /// A rule has neither `from`/`to` nor `with`/`between`
    #[error("rule #{rule} names no route; use from, to, with or between")]
    EmptyRule { rule: usize },
}
