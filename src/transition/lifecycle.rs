//! Lifecycle signals and the checkpoints a transition waits on.

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Why a signal rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct Rejection {
    pub reason: String,
}

impl Rejection {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The rejection seen when a [`SignalTrigger`] is dropped unfired.
    #[must_use]
    pub fn dropped() -> Self {
        Self::new("signal source dropped")
    }
}

/// A settle-once completion signal that any number of waiters can await.
///
/// Cloning is cheap; every clone observes the same outcome.
#[derive(Clone)]
pub struct Signal {
    inner: Shared<BoxFuture<'static, Result<(), Rejection>>>,
}

impl Signal {
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), Rejection>> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    #[must_use]
    pub fn resolved() -> Self {
        Self::from_future(future::ready(Ok(())))
    }

    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::from_future(future::ready(Err(Rejection::new(reason))))
    }

    /// A signal that never settles.
    #[must_use]
    pub fn pending() -> Self {
        Self::from_future(future::pending())
    }

    /// A signal settled through the returned trigger.
    #[must_use]
    pub fn channel() -> (SignalTrigger, Signal) {
        let (sender, receiver) = oneshot::channel();
        let signal = Self::from_future(receiver.map(|outcome| match outcome {
            Ok(result) => result,
            Err(oneshot::Canceled) => Err(Rejection::dropped()),
        }));
        (
            SignalTrigger {
                sender: Some(sender),
            },
            signal,
        )
    }

    /// The outcome, if the signal has settled and been polled since.
    #[must_use]
    pub fn peek(&self) -> Option<Result<(), Rejection>> {
        self.inner.peek().cloned()
    }
}

impl Future for Signal {
    type Output = Result<(), Rejection>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("outcome", &self.peek()).finish()
    }
}

/// The settling side of [`Signal::channel`]. Dropping it rejects the signal.
#[derive(Debug)]
pub struct SignalTrigger {
    sender: Option<oneshot::Sender<Result<(), Rejection>>>,
}

impl SignalTrigger {
    pub fn resolve(mut self) {
        self.settle(Ok(()));
    }

    pub fn reject(mut self, reason: impl Into<String>) {
        self.settle(Err(Rejection::new(reason)));
    }

    fn settle(&mut self, outcome: Result<(), Rejection>) {
        if let Some(sender) = self.sender.take() {
            // the receiving side may already be gone
            sender.send(outcome).ok();
        }
    }
}

/// The checkpoints of a view transition.
///
/// A platform transition implements this directly; cross-document
/// navigations substitute a page-hide signal for every checkpoint.
pub trait Lifecycle {
    /// Pseudo-elements are built and the animation is about to start
    fn ready(&self) -> Signal;
    /// The DOM update callback has completed
    fn update_callback_done(&self) -> Signal;
    /// The animation ended or the transition was skipped
    fn finished(&self) -> Signal;
    fn skip_transition(&self);
}

/// The trigger side of a [`SignalLifecycle::manual`] lifecycle.
#[derive(Debug)]
pub struct LifecycleTriggers {
    pub ready: SignalTrigger,
    pub update_callback_done: SignalTrigger,
    pub finished: SignalTrigger,
}

/// A lifecycle assembled from three signals.
#[derive(Clone)]
pub struct SignalLifecycle {
    ready: Signal,
    update_callback_done: Signal,
    finished: Signal,
    skipped: Arc<AtomicBool>,
}

impl SignalLifecycle {
    #[must_use]
    pub fn new(ready: Signal, update_callback_done: Signal, finished: Signal) -> Self {
        Self {
            ready,
            update_callback_done,
            finished,
            skipped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A lifecycle whose checkpoints are settled by hand.
    #[must_use]
    pub fn manual() -> (Self, LifecycleTriggers) {
        let (ready_trigger, ready) = Signal::channel();
        let (update_trigger, update_callback_done) = Signal::channel();
        let (finished_trigger, finished) = Signal::channel();
        (
            Self::new(ready, update_callback_done, finished),
            LifecycleTriggers {
                ready: ready_trigger,
                update_callback_done: update_trigger,
                finished: finished_trigger,
            },
        )
    }

    /// Replace the update checkpoint, keeping the rest.
    #[must_use]
    pub fn with_update_callback_done(mut self, signal: Signal) -> Self {
        self.update_callback_done = signal;
        self
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped.load(Ordering::Acquire)
    }
}

impl Lifecycle for SignalLifecycle {
    fn ready(&self) -> Signal {
        self.ready.clone()
    }

    fn update_callback_done(&self) -> Signal {
        self.update_callback_done.clone()
    }

    fn finished(&self) -> Signal {
        self.finished.clone()
    }

    fn skip_transition(&self) {
        self.skipped.store(true, Ordering::Release);
    }
}

impl fmt::Debug for SignalLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalLifecycle")
            .field("update_callback_done", &self.update_callback_done)
            .field("finished", &self.finished)
            .field("skipped", &self.is_skipped())
            .finish()
    }
}

/// Lifecycle of an outbound cross-document navigation.
///
/// There is no platform transition on the old page; every checkpoint is the
/// page being hidden. Skipping calls `on_skip`, which is expected to switch
/// the cross-document transition off.
#[derive(Clone)]
pub struct PageHideLifecycle {
    page_hidden: Signal,
    on_skip: Rc<dyn Fn()>,
}

impl PageHideLifecycle {
    pub fn new(page_hidden: Signal, on_skip: impl Fn() + 'static) -> Self {
        Self {
            page_hidden,
            on_skip: Rc::new(on_skip),
        }
    }
}

impl Lifecycle for PageHideLifecycle {
    fn ready(&self) -> Signal {
        self.page_hidden.clone()
    }

    fn update_callback_done(&self) -> Signal {
        self.page_hidden.clone()
    }

    fn finished(&self) -> Signal {
        self.page_hidden.clone()
    }

    fn skip_transition(&self) {
        (self.on_skip)();
    }
}

impl fmt::Debug for PageHideLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHideLifecycle")
            .field("page_hidden", &self.page_hidden)
            .finish_non_exhaustive()
    }
}
