use arc_swap::ArcSwap;
use futures::future::{self, FutureExt, LocalBoxFuture};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cross_document::CrossDocument;
use super::extend::Extension;
use super::host::{HandlerLifecycle, TransitionHost};
use crate::config::{CompiledConfig, Config, ConfigError};
use crate::dom::Document;
use crate::router::{HistoryEntry, MatchResult, NavigateEvent, NavigationDescription};
use crate::runtime_config::RuntimeConfig;
use crate::transition::{
    Lifecycle, Phase, Rejection, SessionSlot, Signal, TransitionOrchestrator, TransitionTask,
};

/// Outcome of [`Choreographer::start_navigation`].
pub enum Navigation<T> {
    /// No transition; the update already ran
    Direct,
    /// The update runs inside `transition`; `task` drives the choreography
    Transition {
        transition: T,
        task: TransitionTask,
        matched: MatchResult,
    },
}

impl<T> Navigation<T> {
    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self, Navigation::Direct)
    }
}

impl<T> fmt::Debug for Navigation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Direct => f.write_str("Direct"),
            Navigation::Transition { task, matched, .. } => f
                .debug_struct("Transition")
                .field("task", task)
                .field("matched", matched)
                .finish_non_exhaustive(),
        }
    }
}

/// Outcome of [`Choreographer::intercept`].
pub enum Interception<T> {
    /// The navigation handler, to be run as is
    Direct(LocalBoxFuture<'static, Result<(), Rejection>>),
    /// The handler runs inside `transition`'s update callback
    Transition {
        transition: T,
        task: TransitionTask,
        matched: MatchResult,
    },
}

impl<T> Interception<T> {
    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self, Interception::Direct(_))
    }
}

impl<T> fmt::Debug for Interception<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interception::Direct(_) => f.write_str("Direct"),
            Interception::Transition { task, matched, .. } => f
                .debug_struct("Transition")
                .field("task", task)
                .field("matched", matched)
                .finish_non_exhaustive(),
        }
    }
}

/// Matches navigations against the configured rules and wraps the matching
/// ones in choreographed view transitions.
pub struct Choreographer<D: Document, H: TransitionHost> {
    config: Arc<ArcSwap<CompiledConfig>>,
    orchestrator: TransitionOrchestrator<D>,
    host: H,
}

impl<D, H> Choreographer<D, H>
where
    D: Document + 'static,
    D::Element: 'static,
    H: TransitionHost,
{
    pub fn new(config: &Config, document: Arc<D>, host: H) -> Result<Self, ConfigError> {
        Ok(Self::from_compiled(CompiledConfig::compile(config)?, document, host))
    }

    #[must_use]
    pub fn from_compiled(config: CompiledConfig, document: Arc<D>, host: H) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            orchestrator: TransitionOrchestrator::new(document),
            host,
        }
    }

    #[must_use]
    pub fn with_runtime_config(mut self, runtime: &RuntimeConfig) -> Self {
        self.orchestrator = self.orchestrator.with_runtime_config(runtime);
        self
    }

    /// Compile `config` and swap it in. Transitions already running keep
    /// the configuration they started with.
    pub fn reload(&self, config: &Config) -> Result<(), ConfigError> {
        let compiled = CompiledConfig::compile(config)?;
        info!(
            rules_count = compiled.router.rules().len(),
            captures_count = compiled.captures.len(),
            styles_count = compiled.styles.len(),
            "Choreographer configuration reloaded"
        );
        self.config.store(Arc::new(compiled));
        Ok(())
    }

    /// Shared handle to the live configuration, for [`crate::hot_reload`].
    #[must_use]
    pub fn config_handle(&self) -> Arc<ArcSwap<CompiledConfig>> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn config(&self) -> Arc<CompiledConfig> {
        self.config.load_full()
    }

    #[must_use]
    pub fn document(&self) -> &Arc<D> {
        self.orchestrator.document()
    }

    #[must_use]
    pub fn orchestrator(&self) -> &TransitionOrchestrator<D> {
        &self.orchestrator
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn find_matching_nav(&self, nav: &NavigationDescription) -> Option<MatchResult> {
        self.config.load().router.find_matching_nav(nav)
    }

    #[must_use]
    pub fn find_matching_nav_for_event(&self, current: &HistoryEntry, event: &NavigateEvent) -> Option<MatchResult> {
        self.config.load().router.find_matching_nav_for_event(current, event)
    }

    /// Claim the session slot for a matched navigation, or explain why the
    /// navigation should go ahead without a transition.
    fn prepare(&self, nav: &NavigationDescription) -> Option<(MatchResult, SessionSlot)> {
        let matched = self.find_matching_nav(nav)?;
        if !self.host.supports_view_transitions() {
            debug!("View transitions unsupported, running update directly");
            return None;
        }
        match self.orchestrator.reserve() {
            Ok(slot) => Some((matched, slot)),
            Err(e) => {
                warn!(error = %e, to = %nav.to, "Skipping transition for navigation");
                None
            }
        }
    }

    /// Run `update` for a programmatic navigation, inside a choreographed
    /// transition when a rule matches.
    pub fn start_navigation<F>(&self, nav: &NavigationDescription, update: F) -> Navigation<H::Transition>
    where
        F: FnOnce() + 'static,
    {
        let Some((matched, slot)) = self.prepare(nav) else {
            update();
            return Navigation::Direct;
        };

        let transition = self.host.start_view_transition(Box::new(move || {
            update();
            future::ready(Ok::<(), Rejection>(())).boxed_local()
        }));
        let params = self.config.load().transition_params(&matched);
        let task = self.orchestrator.start_reserved(slot, params, &transition, Phase::Both);
        Navigation::Transition {
            transition,
            task,
            matched,
        }
    }

    /// Handle a same-document navigation event.
    ///
    /// Without a matching rule the handler is returned to run unwrapped.
    /// Otherwise it becomes the update callback of a new transition, and the
    /// transition's update checkpoint settles when the handler does.
    pub fn intercept<F, Fut>(&self, current: &HistoryEntry, event: &NavigateEvent, handler: F) -> Interception<H::Transition>
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Result<(), Rejection>> + 'static,
    {
        let nav = event.describe(current);
        let Some((matched, slot)) = self.prepare(&nav) else {
            return Interception::Direct(async move { handler().await }.boxed_local());
        };

        let (handler_trigger, handler_done) = Signal::channel();
        let transition = self.host.start_view_transition(Box::new(move || {
            async move {
                let outcome = handler().await;
                match &outcome {
                    Ok(()) => handler_trigger.resolve(),
                    Err(rejection) => handler_trigger.reject(rejection.reason.clone()),
                }
                outcome
            }
            .boxed_local()
        }));
        let lifecycle = HandlerLifecycle::new(transition.clone(), handler_done);
        let params = self.config.load().transition_params(&matched);
        let task = self.orchestrator.start_reserved(slot, params, &lifecycle, Phase::Both);
        Interception::Transition {
            transition,
            task,
            matched,
        }
    }

    /// Add ad-hoc classes, captures and styles to any transition.
    pub fn extend<'a>(&'a self, lifecycle: &'a dyn Lifecycle) -> Extension<'a, D> {
        Extension::new(&self.orchestrator, lifecycle)
    }

    /// Attach cross-document handling.
    pub fn cross_document(&self) -> CrossDocument<'_, D, H> {
        CrossDocument::attach(self)
    }
}

impl<D: Document, H: TransitionHost> fmt::Debug for Choreographer<D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choreographer")
            .field("rules", &self.config.load().router.rules().len())
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}
