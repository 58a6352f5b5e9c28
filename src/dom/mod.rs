//! # Document Port
//!
//! The orchestrator never touches a real document directly. Everything it
//! needs (element queries, attribute reads, per-element transition names, root
//! classes, adopted stylesheets and the cross-document navigation switch) goes
//! through the [`Document`] trait.
//!
//! [`MemoryDocument`] is a headless implementation for tests and for
//! rehearsing a choreography without a browser. A browser binding would
//! implement the same trait over the real DOM.

mod memory;
mod query;

use std::fmt;
use std::hash::Hash;

use crate::style::Stylesheet;

pub use memory::{ElementSpec, MemoryDocument, NodeId};

/// Error for selectors the document or the capture grammar cannot handle.
///
/// These are never fatal: the capture job that hit one is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unsupported selector `{selector}`: {reason}")]
    Unsupported { selector: String, reason: String },
    /// `[:` without a closing `]`
    #[error("unterminated attribute binding in `{0}`")]
    UnterminatedBinding(String),
    /// `[:]`
    #[error("attribute binding without a name in `{0}`")]
    EmptyBinding(String),
}

/// Handle to a stylesheet adopted by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(pub u64);

/// The document operations a transition needs.
///
/// Methods take `&self`; implementations use interior mutability, the way a
/// DOM handle is shared between the code that mutates the page and the
/// transition observing it.
pub trait Document {
    /// Element handle. Cheap to clone and usable as a set key.
    type Element: Clone + Eq + Hash + fmt::Debug;

    /// The document element (`<html>`).
    fn root(&self) -> Self::Element;

    /// All descendants of `root` matching `selector`, in document order.
    fn query_all(&self, root: &Self::Element, selector: &str) -> Result<Vec<Self::Element>, SelectorError>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Set the element's `view-transition-name`.
    fn set_transition_name(&self, element: &Self::Element, name: &str);

    fn remove_transition_name(&self, element: &Self::Element);

    /// Add or remove a class on the root element.
    fn toggle_root_class(&self, class: &str, enabled: bool);

    /// Append a stylesheet to the adopted stylesheet list.
    fn adopt_stylesheet(&self, sheet: &Stylesheet) -> SheetId;

    fn remove_stylesheet(&self, id: SheetId);

    /// Switch cross-document view transitions on or off for the next navigation.
    fn set_cross_document_navigation(&self, enabled: bool);
}
