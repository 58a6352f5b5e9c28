use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use super::TransitionParams;
use crate::capture::CaptureResolver;
use crate::dom::{Document, SheetId};
use crate::ids::SessionId;
use crate::style::{project, Stylesheet};

/// Exclusive claim on an orchestrator's single session.
///
/// Released on drop.
#[derive(Debug)]
pub struct SessionSlot {
    active: Arc<AtomicBool>,
}

impl SessionSlot {
    pub(crate) fn acquire(active: &Arc<AtomicBool>) -> Option<Self> {
        active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                active: Arc::clone(active),
            })
    }
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Document state owned by one running transition.
///
/// Everything applied through the session is undone when it is dropped, so a
/// rejected signal or a cancelled task never leaves names, classes or the
/// stylesheet behind.
pub(crate) struct TransitionSession<D: Document> {
    id: SessionId,
    document: Arc<D>,
    max_capture_jobs: usize,
    named: Vec<D::Element>,
    seen: HashSet<D::Element>,
    classes: Vec<String>,
    sheet: Stylesheet,
    sheet_id: Option<SheetId>,
    _slot: SessionSlot,
}

impl<D: Document> TransitionSession<D> {
    pub(crate) fn new(id: SessionId, document: Arc<D>, slot: SessionSlot, max_capture_jobs: usize) -> Self {
        Self {
            id,
            document,
            max_capture_jobs,
            named: Vec::new(),
            seen: HashSet::new(),
            classes: Vec::new(),
            sheet: Stylesheet::new(),
            sheet_id: None,
            _slot: slot,
        }
    }

    /// Add each root class not already applied. Names are used as given.
    pub(crate) fn add_classes(&mut self, classes: &[String]) {
        for class in classes {
            if self.classes.contains(class) {
                continue;
            }
            self.document.toggle_root_class(class, true);
            self.classes.push(class.clone());
        }
    }

    pub(crate) fn remove_classes(&mut self, classes: &[String]) {
        for class in classes {
            if let Some(position) = self.classes.iter().position(|c| c == class) {
                self.document.toggle_root_class(class, false);
                self.classes.remove(position);
            }
        }
    }

    /// Resolve every capture against the current document and name the
    /// matches; with `project_styles`, also add their styles to the sheet.
    pub(crate) fn capture(&mut self, params: &TransitionParams, project_styles: bool) {
        let resolver = CaptureResolver::new(&*self.document).max_jobs(self.max_capture_jobs);
        let resolved = resolver.resolve_all(&params.captures, &params.params);
        for capture in &resolved {
            self.document.set_transition_name(&capture.element, &capture.name);
            if self.seen.insert(capture.element.clone()) {
                self.named.push(capture.element.clone());
            }
            if project_styles {
                project(&capture.name, &capture.tags, &params.styles, &mut self.sheet);
            }
        }
        debug!(
            session_id = %self.id,
            named = self.named.len(),
            style_rules = self.sheet.len(),
            "Captures applied"
        );
    }

    pub(crate) fn clear_names(&mut self) {
        for element in self.named.drain(..) {
            self.document.remove_transition_name(&element);
        }
        self.seen.clear();
    }

    pub(crate) fn insert_sheet(&mut self) {
        if self.sheet_id.is_none() {
            trace!(session_id = %self.id, css = %self.sheet.css_text(), "Adopting transition stylesheet");
            self.sheet_id = Some(self.document.adopt_stylesheet(&self.sheet));
        }
    }

    pub(crate) fn remove_sheet(&mut self) {
        if let Some(id) = self.sheet_id.take() {
            self.document.remove_stylesheet(id);
        }
    }
}

impl<D: Document> Drop for TransitionSession<D> {
    fn drop(&mut self) {
        let leftovers = self.named.len() + self.classes.len() + usize::from(self.sheet_id.is_some());
        if leftovers > 0 {
            debug!(session_id = %self.id, leftovers, "Cleaning up interrupted transition");
        }
        self.remove_sheet();
        self.clear_names();
        for class in self.classes.drain(..).rev() {
            self.document.toggle_root_class(&class, false);
        }
    }
}
