//! Transition styles: tag-scoped style templates projected into an
//! ephemeral per-transition stylesheet.

mod projector;
mod sheet;

pub use projector::{css_property_name, project, StyleSpec};
pub use sheet::{StyleRule, Stylesheet};
