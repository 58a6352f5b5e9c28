//! The transition state machine.

use futures::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{info, info_span, warn, Instrument};

use super::error::{Checkpoint, TransitionError};
use super::lifecycle::Lifecycle;
use super::session::{SessionSlot, TransitionSession};
use crate::capture::CaptureSpec;
use crate::dom::Document;
use crate::ids::SessionId;
use crate::router::{MatchResult, Params};
use crate::runtime_config::{RuntimeConfig, DEFAULT_MAX_CAPTURE_JOBS};
use crate::style::StyleSpec;

/// Which side of a navigation this document takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Outbound cross-document navigation: only the old state exists here
    OldOnly,
    /// Inbound cross-document navigation: only the new state exists here
    NewOnly,
    /// Same-document transition, end to end
    Both,
}

impl Phase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::OldOnly => "old-only",
            Phase::NewOnly => "new-only",
            Phase::Both => "both",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old-only" => Ok(Phase::OldOnly),
            "new-only" => Ok(Phase::NewOnly),
            "both" => Ok(Phase::Both),
            other => Err(format!("unknown transition phase `{other}`")),
        }
    }
}

/// Root classes per phase.
///
/// `old`, `new` and `both` are stored without [`CLASS_PREFIX`]; the
/// orchestrator adds it and appends `old` and `new` to the respective sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassSets {
    /// Applied before the update, removed once it is done
    pub old: Vec<String>,
    /// Applied after the update, removed when the transition finishes
    pub new: Vec<String>,
    /// Applied for the whole transition
    pub both: Vec<String>,
    /// Applied as written, without the prefix, for the whole transition
    pub unprefixed: Vec<String>,
}

impl ClassSets {
    /// `route-*`/`with-*` for old and new, `from-*`/`to-*` plus the rule class for both.
    ///
    /// A side left open by the rule contributes no class.
    #[must_use]
    pub fn for_match(result: &MatchResult) -> Self {
        let from = result.from.as_deref();
        let to = result.to.as_deref();
        let class = |kind: &str, name: Option<&str>| name.map(|n| format!("{kind}-{n}"));
        Self {
            old: [class("route", from), class("with", to)]
                .into_iter()
                .flatten()
                .collect(),
            new: [class("route", to), class("with", from)]
                .into_iter()
                .flatten()
                .collect(),
            both: [class("from", from), class("to", to), result.class.clone()]
                .into_iter()
                .flatten()
                .collect(),
            unprefixed: Vec::new(),
        }
    }
}

/// Everything one transition applies to the document.
#[derive(Debug, Clone)]
pub struct TransitionParams {
    pub classes: ClassSets,
    pub captures: Arc<[CaptureSpec]>,
    pub styles: Arc<[StyleSpec]>,
    /// Substituted into capture templates
    pub params: Params,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            classes: ClassSets::default(),
            captures: Vec::new().into(),
            styles: Vec::new().into(),
            params: Params::new(),
        }
    }
}

/// A started transition.
///
/// The first phase is applied before [`TransitionOrchestrator::start`]
/// returns; polling the task drives the rest. Dropping it early cleans up
/// whatever was applied.
#[must_use = "a transition only progresses while its task is polled"]
pub struct TransitionTask {
    id: SessionId,
    future: LocalBoxFuture<'static, Result<(), TransitionError>>,
}

impl TransitionTask {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Future for TransitionTask {
    type Output = Result<(), TransitionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll_unpin(cx)
    }
}

impl fmt::Debug for TransitionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTask").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Prefix applied to every rule-derived root class.
pub const CLASS_PREFIX: &str = "vt-";

fn prefixed(classes: &[String], marker: Option<&str>) -> Vec<String> {
    classes
        .iter()
        .map(String::as_str)
        .chain(marker)
        .map(|class| format!("{CLASS_PREFIX}{class}"))
        .collect()
}

fn enter_new<D: Document>(
    session: &mut TransitionSession<D>,
    new_classes: &[String],
    both_classes: &[String],
    params: &TransitionParams,
) {
    session.add_classes(new_classes);
    session.add_classes(both_classes);
    session.capture(params, true);
    session.insert_sheet();
}

fn rejected(checkpoint: Checkpoint, reason: String) -> TransitionError {
    warn!(%checkpoint, reason = %reason, "Transition signal rejected, cleaned up");
    TransitionError::Rejected { checkpoint, reason }
}

/// Drives transitions against one document, one session at a time.
pub struct TransitionOrchestrator<D: Document> {
    document: Arc<D>,
    active: Arc<AtomicBool>,
    max_capture_jobs: usize,
}

impl<D> TransitionOrchestrator<D>
where
    D: Document + 'static,
    D::Element: 'static,
{
    #[must_use]
    pub fn new(document: Arc<D>) -> Self {
        Self {
            document,
            active: Arc::new(AtomicBool::new(false)),
            max_capture_jobs: DEFAULT_MAX_CAPTURE_JOBS,
        }
    }

    #[must_use]
    pub fn with_runtime_config(mut self, config: &RuntimeConfig) -> Self {
        self.max_capture_jobs = config.max_capture_jobs;
        self
    }

    #[must_use]
    pub fn document(&self) -> &Arc<D> {
        &self.document
    }

    /// Whether a session currently owns the document.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Claim the session slot ahead of starting a transition.
    pub fn reserve(&self) -> Result<SessionSlot, TransitionError> {
        SessionSlot::acquire(&self.active).ok_or(TransitionError::SessionActive)
    }

    /// Start a transition.
    ///
    /// Fails with [`TransitionError::SessionActive`] without touching the
    /// document when another session is running.
    pub fn start(
        &self,
        params: TransitionParams,
        lifecycle: &dyn Lifecycle,
        phase: Phase,
    ) -> Result<TransitionTask, TransitionError> {
        let slot = self.reserve()?;
        Ok(self.start_reserved(slot, params, lifecycle, phase))
    }

    /// Start a transition in a slot obtained from [`reserve`](Self::reserve).
    pub fn start_reserved(
        &self,
        slot: SessionSlot,
        params: TransitionParams,
        lifecycle: &dyn Lifecycle,
        phase: Phase,
    ) -> TransitionTask {
        let id = SessionId::new();
        let span = info_span!("transition", session_id = %id, %phase);
        let entered = span.enter();

        info!(
            old = ?params.classes.old,
            new = ?params.classes.new,
            both = ?params.classes.both,
            captures = params.captures.len(),
            styles = params.styles.len(),
            "Transition started"
        );

        let update_done = lifecycle.update_callback_done();
        let finished = lifecycle.finished();
        let old_classes = prefixed(&params.classes.old, Some("old"));
        let new_classes = prefixed(&params.classes.new, Some("new"));
        let mut both_classes = prefixed(&params.classes.both, None);
        both_classes.extend(params.classes.unprefixed.iter().cloned());
        let project_styles = phase != Phase::OldOnly;

        let mut session = TransitionSession::new(id, Arc::clone(&self.document), slot, self.max_capture_jobs);

        if phase == Phase::NewOnly {
            enter_new(&mut session, &new_classes, &both_classes, &params);
        } else {
            session.add_classes(&old_classes);
            session.add_classes(&both_classes);
            session.capture(&params, project_styles);
        }
        drop(entered);

        let future = async move {
            if phase != Phase::NewOnly {
                let outcome = update_done.await;
                session.remove_classes(&old_classes);
                session.clear_names();
                if let Err(rejection) = outcome {
                    return Err(rejected(Checkpoint::UpdateCallbackDone, rejection.reason));
                }
                if phase == Phase::OldOnly {
                    session.remove_classes(&both_classes);
                    info!("Transition finished");
                    return Ok(());
                }
                enter_new(&mut session, &new_classes, &both_classes, &params);
            }

            let outcome = finished.await;
            session.remove_sheet();
            session.clear_names();
            session.remove_classes(&new_classes);
            session.remove_classes(&both_classes);
            match outcome {
                Ok(()) => {
                    info!("Transition finished");
                    Ok(())
                }
                Err(rejection) => Err(rejected(Checkpoint::Finished, rejection.reason)),
            }
        };

        TransitionTask {
            id,
            future: future.instrument(span).boxed_local(),
        }
    }
}

impl<D: Document> fmt::Debug for TransitionOrchestrator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionOrchestrator")
            .field("active", &self.active.load(Ordering::Acquire))
            .field("max_capture_jobs", &self.max_capture_jobs)
            .finish_non_exhaustive()
    }
}
