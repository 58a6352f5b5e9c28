//! # Capture Module
//!
//! Captures pick the elements that take part in a transition and give each
//! one a `view-transition-name`.
//!
//! A capture is a pair of templates:
//!
//! - the **selector**, e.g. `li#song$(song_id) a` or `main section[:name] .hero`
//! - the **name**, e.g. `song-art` or `part-$(name).any-box`
//!
//! `$(key)` tokens are substituted from the navigation's params. A `[:attr]`
//! marker in the selector binds the attribute `attr` of every element matched
//! so far and continues the rest of the selector below that element. Binding
//! is breadth-first, each matched element spawning its own job.
//!
//! `.tag` fragments in the rendered name are stripped and returned as class
//! tags; the style projector uses them to pick style rules for that element.

mod core;
mod selector;
mod template;

pub use crate::dom::SelectorError;
pub use self::core::{CaptureResolver, CaptureSpec, ResolvedCapture};
pub use selector::{Bind, SelectorProgram};
pub use template::{GeneratedName, Template};
