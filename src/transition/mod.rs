//! # Transition Module
//!
//! The orchestrator applies a matched navigation to the document for the
//! lifetime of one view transition.
//!
//! ## Sequence
//!
//! For phase `both` (a same-document transition):
//!
//! 1. add the `old` and `both` root classes, resolve captures against the
//!    current DOM and name the matches
//! 2. wait for `update_callback_done`, then remove the `old` classes and the names
//! 3. add the `new` classes, resolve captures against the updated DOM, adopt
//!    the transition stylesheet
//! 4. wait for `finished`, then remove the stylesheet, the names and the
//!    `new` and `both` classes
//!
//! Phase `old-only` stops after step 2 and also drops the `both` classes.
//! Phase `new-only` starts at step 3.
//!
//! Step 1 (or step 3 for `new-only`) runs before
//! [`TransitionOrchestrator::start`] returns. A rejected signal still runs
//! the cleanup for everything applied so far, then surfaces as
//! [`TransitionError::Rejected`].
//!
//! ## Single session
//!
//! Root classes and adopted stylesheets are document-wide, so an
//! orchestrator runs at most one session. Starting another while one is
//! active fails with [`TransitionError::SessionActive`].

mod core;
mod error;
mod lifecycle;
mod session;

pub use self::core::{ClassSets, CLASS_PREFIX, Phase, TransitionOrchestrator, TransitionParams, TransitionTask};
pub use error::{Checkpoint, TransitionError};
pub use lifecycle::{Lifecycle, LifecycleTriggers, PageHideLifecycle, Rejection, Signal, SignalLifecycle, SignalTrigger};
pub use session::SessionSlot;
