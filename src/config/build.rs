use std::sync::Arc;

use super::error::ConfigError;
use super::types::Config;
use crate::capture::CaptureSpec;
use crate::router::{MatchResult, NavRouter};
use crate::runtime_config::RuntimeConfig;
use crate::style::StyleSpec;
use crate::transition::{ClassSets, TransitionParams};

/// A configuration with its routes compiled and its templates parsed.
///
/// This is what the [`Choreographer`](crate::Choreographer) swaps on reload.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub router: NavRouter,
    pub captures: Arc<[CaptureSpec]>,
    pub styles: Arc<[StyleSpec]>,
}

impl CompiledConfig {
    pub fn compile(config: &Config) -> Result<Self, ConfigError> {
        let router = NavRouter::new(config)?;
        let captures = config
            .captures
            .iter()
            .map(|(selector, name)| CaptureSpec::new(selector, name))
            .collect();
        let styles = config
            .styles
            .iter()
            .map(|(selector, declaration)| StyleSpec::new(selector, declaration))
            .collect();
        Ok(Self {
            router,
            captures,
            styles,
        })
    }

    /// Compile `config`, falling back to the runtime base URL when the
    /// configuration declares none.
    pub fn compile_with_runtime(config: &Config, runtime: &RuntimeConfig) -> Result<Self, ConfigError> {
        match (&config.base_url, &runtime.base_url) {
            (None, Some(base_url)) => {
                let mut config = config.clone();
                config.base_url = Some(base_url.clone());
                Self::compile(&config)
            }
            _ => Self::compile(config),
        }
    }

    /// Everything the orchestrator needs to run the transition for a match.
    #[must_use]
    pub fn transition_params(&self, result: &MatchResult) -> TransitionParams {
        TransitionParams {
            classes: ClassSets::for_match(result),
            captures: Arc::clone(&self.captures),
            styles: Arc::clone(&self.styles),
            params: result.params.clone(),
        }
    }
}
