use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::core::Choreographer;
use super::host::TransitionHost;
use crate::dom::Document;
use crate::ids::SessionId;
use crate::router::{Activation, HistoryEntry, NavigateEvent};
use crate::transition::{Lifecycle, PageHideLifecycle, Phase, Signal, SignalTrigger, TransitionTask};

/// Dispatched to [`CrossDocument`] listeners when a cross-document
/// transition is choreographed.
pub enum CrossDocumentEvent<'e> {
    /// The old page started its half of an outbound navigation
    OldOnly {
        session: SessionId,
        lifecycle: &'e dyn Lifecycle,
    },
    /// The new page started its half of an inbound navigation
    NewOnly {
        session: SessionId,
        lifecycle: &'e dyn Lifecycle,
    },
}

impl CrossDocumentEvent<'_> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            CrossDocumentEvent::OldOnly { .. } => Phase::OldOnly,
            CrossDocumentEvent::NewOnly { .. } => Phase::NewOnly,
        }
    }

    #[must_use]
    pub fn session(&self) -> SessionId {
        match self {
            CrossDocumentEvent::OldOnly { session, .. } | CrossDocumentEvent::NewOnly { session, .. } => *session,
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> &dyn Lifecycle {
        match self {
            CrossDocumentEvent::OldOnly { lifecycle, .. } | CrossDocumentEvent::NewOnly { lifecycle, .. } => *lifecycle,
        }
    }
}

impl fmt::Debug for CrossDocumentEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossDocumentEvent")
            .field("phase", &self.phase())
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

type Listener = Box<dyn Fn(&CrossDocumentEvent<'_>)>;

/// Cross-document (multi-page) navigation handling.
///
/// The embedder forwards three page events:
///
/// - [`on_navigate`](Self::on_navigate) when the old page starts navigating away
/// - [`on_page_hide`](Self::on_page_hide) when the old page is hidden
/// - [`on_page_reveal`](Self::on_page_reveal) when the new page is first rendered
///
/// Navigations matching no rule switch the cross-document transition off
/// (outbound) or skip it (inbound).
pub struct CrossDocument<'c, D: Document, H: TransitionHost> {
    choreographer: &'c Choreographer<D, H>,
    enabled: bool,
    listeners: RefCell<Vec<Listener>>,
    page_hidden: RefCell<Vec<SignalTrigger>>,
}

impl<'c, D, H> CrossDocument<'c, D, H>
where
    D: Document + 'static,
    D::Element: 'static,
    H: TransitionHost,
{
    pub(crate) fn attach(choreographer: &'c Choreographer<D, H>) -> Self {
        let enabled = choreographer.host().supports_cross_document();
        if enabled {
            choreographer.document().set_cross_document_navigation(true);
        } else {
            warn!("Cross-document view transitions not supported");
        }
        Self {
            choreographer,
            enabled,
            listeners: RefCell::new(Vec::new()),
            page_hidden: RefCell::new(Vec::new()),
        }
    }

    /// Whether the host supports cross-document transitions. When it does
    /// not, every handler is a no-op.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn add_listener(&self, listener: impl Fn(&CrossDocumentEvent<'_>) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn dispatch(&self, event: &CrossDocumentEvent<'_>) {
        for listener in self.listeners.borrow().iter() {
            listener(event);
        }
    }

    /// Outbound navigation from this page.
    ///
    /// Returns the old-only task, which completes once the page is hidden.
    /// The task holds the document's session until then. If the navigation
    /// is cancelled and the page stays, drop the task: that removes the
    /// classes and names it applied and frees the session.
    pub fn on_navigate(&self, current: &HistoryEntry, event: &NavigateEvent) -> Option<TransitionTask> {
        if !self.enabled {
            return None;
        }
        let document = self.choreographer.document();
        let Some(matched) = self.choreographer.find_matching_nav_for_event(current, event) else {
            debug!(to = %event.destination.url, "No rule for outbound navigation, disabling cross-document transition");
            document.set_cross_document_navigation(false);
            return None;
        };

        let slot = match self.choreographer.orchestrator().reserve() {
            Ok(slot) => slot,
            Err(e) => {
                warn!(error = %e, "Skipping outbound cross-document choreography");
                return None;
            }
        };

        let (trigger, page_hidden) = Signal::channel();
        self.page_hidden.borrow_mut().push(trigger);
        let switch = Arc::clone(document);
        let lifecycle = PageHideLifecycle::new(page_hidden, move || switch.set_cross_document_navigation(false));

        let params = self.choreographer.config().transition_params(&matched);
        let task = self
            .choreographer
            .orchestrator()
            .start_reserved(slot, params, &lifecycle, Phase::OldOnly);
        self.dispatch(&CrossDocumentEvent::OldOnly {
            session: task.id(),
            lifecycle: &lifecycle,
        });
        Some(task)
    }

    /// The old page is being hidden: settle outbound transitions and switch
    /// cross-document transitions back on for the next navigation.
    pub fn on_page_hide(&self) {
        if !self.enabled {
            return;
        }
        self.choreographer.document().set_cross_document_navigation(true);
        for trigger in self.page_hidden.borrow_mut().drain(..) {
            trigger.resolve();
        }
    }

    /// Inbound navigation into this page.
    ///
    /// `transition` is the platform transition handed to the new page, if
    /// any. It is skipped when no rule matches the activation.
    pub fn on_page_reveal(&self, activation: &Activation, transition: Option<&dyn Lifecycle>) -> Option<TransitionTask> {
        if !self.enabled {
            return None;
        }
        let transition = transition?;
        let Some(matched) = self.choreographer.find_matching_nav(&activation.describe()) else {
            debug!(to = %activation.entry.url, "No rule for inbound navigation, skipping transition");
            transition.skip_transition();
            return None;
        };

        let slot = match self.choreographer.orchestrator().reserve() {
            Ok(slot) => slot,
            Err(e) => {
                warn!(error = %e, "Skipping inbound cross-document choreography");
                return None;
            }
        };
        let params = self.choreographer.config().transition_params(&matched);
        let task = self
            .choreographer
            .orchestrator()
            .start_reserved(slot, params, transition, Phase::NewOnly);
        self.dispatch(&CrossDocumentEvent::NewOnly {
            session: task.id(),
            lifecycle: transition,
        });
        Some(task)
    }
}

impl<D: Document, H: TransitionHost> fmt::Debug for CrossDocument<'_, D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossDocument")
            .field("enabled", &self.enabled)
            .field("listeners", &self.listeners.borrow().len())
            .field("pending_page_hide", &self.page_hidden.borrow().len())
            .finish()
    }
}
