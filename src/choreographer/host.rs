use futures::future::LocalBoxFuture;

use crate::transition::{Lifecycle, Signal};

/// The DOM update a view transition wraps.
///
/// Hosts call it once, after the old state has been captured, and settle
/// `update_callback_done` from its outcome.
pub type UpdateCallback = Box<dyn FnOnce() -> LocalBoxFuture<'static, Result<(), crate::transition::Rejection>>>;

/// The platform's view transition primitive.
pub trait TransitionHost {
    /// Handle to a started transition.
    type Transition: Lifecycle + Clone + 'static;

    /// Whether same-document view transitions are available at all.
    fn supports_view_transitions(&self) -> bool;

    /// Start a transition around `update`.
    fn start_view_transition(&self, update: UpdateCallback) -> Self::Transition;

    /// Whether cross-document view transitions are available.
    fn supports_cross_document(&self) -> bool {
        false
    }
}

/// A host transition whose update checkpoint is replaced by the completion
/// of an intercepted navigation handler.
#[derive(Debug, Clone)]
pub struct HandlerLifecycle<T> {
    inner: T,
    handler_done: Signal,
}

impl<T: Lifecycle> HandlerLifecycle<T> {
    pub fn new(inner: T, handler_done: Signal) -> Self {
        Self { inner, handler_done }
    }
}

impl<T: Lifecycle> Lifecycle for HandlerLifecycle<T> {
    fn ready(&self) -> Signal {
        self.inner.ready()
    }

    fn update_callback_done(&self) -> Signal {
        self.handler_done.clone()
    }

    fn finished(&self) -> Signal {
        self.inner.finished()
    }

    fn skip_transition(&self) {
        self.inner.skip_transition();
    }
}
