//! Headless [`Document`] backed by an in-memory element tree.

use parking_lot::Mutex;
use std::fmt;

use super::query::{complex_matches, parse_selector, ElementView};
use super::{Document, SelectorError, SheetId};
use crate::style::Stylesheet;

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Description of an element subtree to insert.
///
/// ```rust
/// use velvette::dom::{ElementSpec, MemoryDocument};
///
/// let doc = MemoryDocument::new();
/// let section = doc.append(
///     doc.root_id(),
///     ElementSpec::new("section")
///         .attr("name", "faq")
///         .child(ElementSpec::new("div").class("hero")),
/// );
/// assert_eq!(doc.attribute_of(section, "name").as_deref(), Some("faq"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class to the element's `class` attribute.
    #[must_use]
    pub fn class(self, class: &str) -> Self {
        let list = match self.attributes.iter().find(|(k, _)| k == "class") {
            Some((_, existing)) => format!("{existing} {class}"),
            None => class.to_string(),
        };
        self.attr("class", list)
    }

    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    transition_name: Option<String>,
}

impl Node {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct View<'a> {
    node: &'a Node,
    root: bool,
}

impl ElementView for View<'_> {
    fn tag(&self) -> &str {
        &self.node.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.node.attribute(name)
    }

    fn is_root(&self) -> bool {
        self.root
    }
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    sheets: Vec<(SheetId, Stylesheet)>,
    next_sheet: u64,
    cross_document: Option<bool>,
}

impl Tree {
    fn insert(&mut self, parent: usize, spec: ElementSpec) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: spec.tag,
            attributes: spec.attributes,
            parent: Some(parent),
            children: Vec::new(),
            transition_name: None,
        });
        self.nodes[parent].children.push(id);
        for child in spec.children {
            self.insert(id, child);
        }
        id
    }

    fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        out
    }

    fn path_to(&self, node: usize) -> Vec<View<'_>> {
        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            path.push(View {
                node: &self.nodes[id],
                root: id == 0,
            });
            cursor = self.nodes[id].parent;
        }
        path.reverse();
        path
    }

    fn set_attribute(&mut self, node: usize, name: &str, value: Option<String>) {
        let attrs = &mut self.nodes[node].attributes;
        let position = attrs.iter().position(|(k, _)| k == name);
        match (position, value) {
            (Some(i), Some(v)) => attrs[i].1 = v,
            (None, Some(v)) => attrs.push((name.to_string(), v)),
            (Some(i), None) => {
                attrs.remove(i);
            }
            (None, None) => {}
        }
    }
}

/// An in-memory document with an `<html>` root.
///
/// Root classes are kept in the root's `class` attribute so `:root.vt-*`
/// selectors see them, just as in a browser.
#[derive(Debug)]
pub struct MemoryDocument {
    tree: Mutex<Tree>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            tag: "html".to_string(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            transition_name: None,
        };
        Self {
            tree: Mutex::new(Tree {
                nodes: vec![root],
                ..Tree::default()
            }),
        }
    }

    #[must_use]
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Insert a subtree as the last child of `parent`.
    pub fn append(&self, parent: NodeId, spec: ElementSpec) -> NodeId {
        NodeId(self.tree.lock().insert(parent.0, spec))
    }

    /// Detach every child of `parent`.
    ///
    /// Detached elements keep their state (including any transition name)
    /// but can no longer be reached by queries.
    pub fn remove_children(&self, parent: NodeId) {
        let mut tree = self.tree.lock();
        let children = std::mem::take(&mut tree.nodes[parent.0].children);
        for child in children {
            tree.nodes[child].parent = None;
        }
    }

    /// Replace the children of `parent`, as a DOM update callback would.
    pub fn replace_children(&self, parent: NodeId, specs: impl IntoIterator<Item = ElementSpec>) -> Vec<NodeId> {
        self.remove_children(parent);
        let mut tree = self.tree.lock();
        specs
            .into_iter()
            .map(|spec| NodeId(tree.insert(parent.0, spec)))
            .collect()
    }

    #[must_use]
    pub fn tag_of(&self, node: NodeId) -> String {
        self.tree.lock().nodes[node.0].tag.clone()
    }

    #[must_use]
    pub fn attribute_of(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.lock().nodes[node.0].attribute(name).map(str::to_string)
    }

    /// First attached element whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.lock();
        tree.descendants(0)
            .into_iter()
            .find(|&n| tree.nodes[n].attribute("id") == Some(id))
            .map(NodeId)
    }

    #[must_use]
    pub fn transition_name(&self, node: NodeId) -> Option<String> {
        self.tree.lock().nodes[node.0].transition_name.clone()
    }

    /// Every element, attached or not, that currently has a transition name.
    #[must_use]
    pub fn named_elements(&self) -> Vec<(NodeId, String)> {
        self.tree
            .lock()
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.transition_name.clone().map(|name| (NodeId(i), name)))
            .collect()
    }

    #[must_use]
    pub fn root_classes(&self) -> Vec<String> {
        self.tree.lock().nodes[0]
            .attribute("class")
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_root_class(&self, class: &str) -> bool {
        self.root_classes().iter().any(|c| c == class)
    }

    /// Adopted stylesheets in insertion order.
    #[must_use]
    pub fn stylesheets(&self) -> Vec<Stylesheet> {
        self.tree.lock().sheets.iter().map(|(_, s)| s.clone()).collect()
    }

    /// The last value passed to [`Document::set_cross_document_navigation`].
    #[must_use]
    pub fn cross_document_navigation(&self) -> Option<bool> {
        self.tree.lock().cross_document
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn root(&self) -> NodeId {
        self.root_id()
    }

    fn query_all(&self, root: &NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = parse_selector(selector)?;
        let tree = self.tree.lock();
        let found = tree
            .descendants(root.0)
            .into_iter()
            .filter(|&n| {
                let path = tree.path_to(n);
                list.iter().any(|complex| complex_matches(complex, &path))
            })
            .map(NodeId)
            .collect();
        Ok(found)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.attribute_of(*element, name)
    }

    fn set_transition_name(&self, element: &NodeId, name: &str) {
        self.tree.lock().nodes[element.0].transition_name = Some(name.to_string());
    }

    fn remove_transition_name(&self, element: &NodeId) {
        self.tree.lock().nodes[element.0].transition_name = None;
    }

    fn toggle_root_class(&self, class: &str, enabled: bool) {
        let mut tree = self.tree.lock();
        let mut classes: Vec<String> = tree.nodes[0]
            .attribute("class")
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let present = classes.iter().any(|c| c == class);
        match (enabled, present) {
            (true, false) => classes.push(class.to_string()),
            (false, true) => classes.retain(|c| c != class),
            _ => return,
        }
        let value = (!classes.is_empty()).then(|| classes.join(" "));
        tree.set_attribute(0, "class", value);
    }

    fn adopt_stylesheet(&self, sheet: &Stylesheet) -> SheetId {
        let mut tree = self.tree.lock();
        let id = SheetId(tree.next_sheet);
        tree.next_sheet += 1;
        tree.sheets.push((id, sheet.clone()));
        id
    }

    fn remove_stylesheet(&self, id: SheetId) {
        self.tree.lock().sheets.retain(|(sheet, _)| *sheet != id);
    }

    fn set_cross_document_navigation(&self, enabled: bool) {
        self.tree.lock().cross_document = Some(enabled);
    }
}
