//! # Choreographer Module
//!
//! The public entry points: thin adapters joining the router and the
//! transition orchestrator.
//!
//! - [`Choreographer::start_navigation`] wraps a programmatic DOM update
//! - [`Choreographer::intercept`] wraps a same-document navigation handler
//! - [`Choreographer::cross_document`] handles both halves of a multi-page
//!   navigation
//! - [`Choreographer::extend`] choreographs a transition started elsewhere
//!
//! When no rule matches, when the host has no view transition support, or
//! when another transition still owns the document, the update runs directly
//! without any classes or names being applied.

mod core;
mod cross_document;
mod extend;
mod host;

pub use self::core::{Choreographer, Interception, Navigation};
pub use cross_document::{CrossDocument, CrossDocumentEvent};
pub use extend::Extension;
pub use host::{HandlerLifecycle, TransitionHost, UpdateCallback};
