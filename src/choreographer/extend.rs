use crate::capture::CaptureSpec;
use crate::config::CssValue;
use crate::dom::Document;
use crate::router::Params;
use crate::style::StyleSpec;
use crate::transition::{
    ClassSets, Lifecycle, Phase, TransitionError, TransitionOrchestrator, TransitionParams, TransitionTask,
};

/// Ad-hoc choreography for a transition started outside the route table.
///
/// ```rust
/// use std::sync::Arc;
/// use velvette::dom::{ElementSpec, MemoryDocument};
/// use velvette::transition::{SignalLifecycle, TransitionOrchestrator};
/// use velvette::choreographer::Extension;
///
/// let doc = Arc::new(MemoryDocument::new());
/// doc.append(doc.root_id(), ElementSpec::new("div").class("box").id("a"));
/// let orchestrator = TransitionOrchestrator::new(Arc::clone(&doc));
/// let (lifecycle, _triggers) = SignalLifecycle::manual();
///
/// let _task = Extension::new(&orchestrator, &lifecycle)
///     .class("shuffle")
///     .capture(".box[:id]", "box-$(id).any-box")
///     .style("::view-transition-group(.any-box)", [("animationDuration", "1s")])
///     .start()
///     .unwrap();
/// assert!(doc.has_root_class("shuffle"));
/// assert!(doc.has_root_class("vt-old"));
/// ```
pub struct Extension<'a, D: Document> {
    orchestrator: &'a TransitionOrchestrator<D>,
    lifecycle: &'a dyn Lifecycle,
    classes: Vec<String>,
    captures: Vec<CaptureSpec>,
    styles: Vec<StyleSpec>,
    params: Params,
}

impl<'a, D> Extension<'a, D>
where
    D: Document + 'static,
    D::Element: 'static,
{
    pub fn new(orchestrator: &'a TransitionOrchestrator<D>, lifecycle: &'a dyn Lifecycle) -> Self {
        Self {
            orchestrator,
            lifecycle,
            classes: Vec::new(),
            captures: Vec::new(),
            styles: Vec::new(),
            params: Params::new(),
        }
    }

    /// Apply `class` to the root, as written, for the whole transition.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn capture(mut self, selector: &str, name: &str) -> Self {
        self.captures.push(CaptureSpec::new(selector, name));
        self
    }

    #[must_use]
    pub fn style<K, V>(mut self, selector: &str, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<CssValue>,
    {
        self.styles.push(StyleSpec::with_properties(selector, properties));
        self
    }

    /// Provide a value for `$(key)` tokens in the capture templates.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Start the transition with phase `both`.
    pub fn start(self) -> Result<TransitionTask, TransitionError> {
        let params = TransitionParams {
            classes: ClassSets {
                unprefixed: self.classes,
                ..ClassSets::default()
            },
            captures: self.captures.into(),
            styles: self.styles.into(),
            params: self.params,
        };
        self.orchestrator.start(params, self.lifecycle, Phase::Both)
    }
}
