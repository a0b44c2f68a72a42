//! Host document
//!
//! The dialog core wraps anchors that live in an HTML document. The tree is a
//! [`scraper::Html`] so that pages can be loaded from markup and queried with
//! real CSS selectors; the coarse inline [`Style`] and click [`Listener`] the
//! overlay layer drives are kept beside it, keyed by [`NodeId`].
//!
//! Detached nodes stay in the tree as orphans; a node is only reachable through
//! [`Document::find_by_id`] while it is attached under `body`.

pub mod style;

pub use style::{Display, Rgba, Style, StylePatch, Transform};

use html5ever::tendril::StrTendril;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};
use schemars::JsonSchema;
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(ego_tree::NodeId);

/// Click behavior attached to an element
///
/// Listeners are plain data; [`crate::dialogs::DialogManager::click`] interprets
/// them while bubbling a click from the target towards the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Swallow the click so ancestors never see it
    StopPropagation,
    /// Dismiss whichever dialog is topmost
    DismissTop,
    /// Backdrop click: always stops propagation, dismisses the topmost
    /// dialog unless the owning dialog is modal
    Backdrop { modal: bool },
}

static UNSTYLED: Style = Style {
    display: Display::Unset,
    z_index: None,
    opacity: None,
    transform: None,
    background: None,
};

/// Borrowed view of a single element
#[derive(Clone, Copy)]
pub struct Element<'a> {
    document: &'a Document,
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    pub fn node(self) -> NodeId {
        NodeId(self.element.id())
    }

    pub fn tag(self) -> &'a str {
        self.element.value().name()
    }

    pub fn id(self) -> Option<&'a str> {
        self.element.value().id()
    }

    pub fn classes(self) -> Vec<&'a str> {
        self.element
            .value()
            .attr("class")
            .map(|class| class.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Space-joined class list
    pub fn class_name(self) -> String {
        self.classes().join(" ")
    }

    pub fn has_class(self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    /// Text held directly by this element, ignoring whitespace-only runs
    pub fn own_text(self) -> String {
        self.element
            .children()
            .filter_map(|child| child.value().as_text())
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn style(self) -> &'a Style {
        self.document.styles.get(&self.node()).unwrap_or(&UNSTYLED)
    }

    pub fn parent(self) -> Option<NodeId> {
        self.element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| NodeId(parent.id()))
    }

    /// Element children in order; text nodes are skipped
    pub fn children(self) -> Vec<NodeId> {
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(|child| NodeId(child.id()))
            .collect()
    }

    pub fn listener(self) -> Option<Listener> {
        self.document.listeners.get(&self.node()).copied()
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag())
            .field("id", &self.id())
            .field("class", &self.class_name())
            .finish()
    }
}

/// Serializable description of a subtree, used to seed a document
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NodeSpec {
    #[serde(default = "NodeSpec::default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Space separated class names
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    fn default_tag() -> String {
        "div".to_string()
    }

    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Iterator over the strict element ancestors of a node, nearest first
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.get(current).and_then(Element::parent);
        Some(current)
    }
}

fn qual_name(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: StrTendril::from_slice(value),
    }
}

/// HTML tree plus the inline state the overlay layer toggles
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    body: NodeId,
    styles: HashMap<NodeId, Style>,
    listeners: HashMap<NodeId, Listener>,
}

impl Document {
    /// Empty page: `html`, `head` and an empty `body`
    pub fn new() -> Self {
        Self::parse("")
    }

    /// Parse a full page; fragments are placed under `body`
    pub fn parse(markup: &str) -> Self {
        let mut html = Html::parse_document(markup);
        let root = html.root_element();
        let body = root
            .children()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "body")
            .map(|body| body.id());

        let body = match body {
            Some(body) => body,
            None => {
                let root = root.id();
                let body = html
                    .tree
                    .orphan(Node::Element(scraper::node::Element::new(qual_name("body"), Vec::new())))
                    .id();
                if let Some(mut root) = html.tree.get_mut(root) {
                    root.append_id(body);
                }
                body
            }
        };

        Self {
            html,
            body: NodeId(body),
            styles: HashMap::new(),
            listeners: HashMap::new(),
        }
    }

    /// Build a page whose body holds the given subtrees in order
    pub fn from_nodes(nodes: &[NodeSpec]) -> Self {
        let mut document = Self::new();
        document.extend(nodes);
        document
    }

    /// Append the given subtrees to the body
    pub fn extend(&mut self, nodes: &[NodeSpec]) {
        let body = self.body;
        for spec in nodes {
            self.build(body, spec);
        }
    }

    fn build(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let node = self.create_element(&spec.tag);
        if let Some(id) = &spec.id {
            self.set_id(node, id);
        }
        if let Some(class) = &spec.class {
            self.set_class_name(node, class);
        }
        if let Some(text) = &spec.text {
            self.set_text(node, text);
        }
        self.append_child(parent, node);
        for child in &spec.children {
            self.build(node, child);
        }
        node
    }

    /// The `body` element; the scope for id lookups and clicks
    pub fn root(&self) -> NodeId {
        self.body
    }

    fn element_ref(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node.0).and_then(ElementRef::wrap)
    }

    pub fn get(&self, node: NodeId) -> Option<Element<'_>> {
        self.element_ref(node).map(|element| Element {
            document: self,
            element,
        })
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let element = scraper::node::Element::new(qual_name(&tag.to_ascii_lowercase()), Vec::new());
        NodeId(self.html.tree.orphan(Node::Element(element)).id())
    }

    /// Rebuild the element with attribute `name` set to `value`, or removed
    /// when `value` is `None`
    fn set_attr(&mut self, node: NodeId, name: &str, value: Option<&str>) {
        let Some(mut node) = self.html.tree.get_mut(node.0) else {
            return;
        };
        let Node::Element(element) = node.value() else {
            return;
        };

        let mut attrs: Vec<Attribute> = element
            .attrs()
            .filter(|(key, _)| *key != name)
            .map(|(key, value)| attribute(key, value))
            .collect();
        if let Some(value) = value {
            attrs.push(attribute(name, value));
        }

        let qual = element.name.clone();
        *element = scraper::node::Element::new(qual, attrs);
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.set_attr(node, "id", Some(id));
    }

    pub fn remove_id(&mut self, node: NodeId) {
        self.set_attr(node, "id", None);
    }

    /// Replace the whole class list with the space separated `class_name`
    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        let normalized = class_name.split_whitespace().collect::<Vec<_>>().join(" ");
        self.set_attr(node, "class", Some(&normalized));
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(element) = self.get(node) else {
            return;
        };
        if element.has_class(class) {
            return;
        }
        let mut classes = element.classes();
        classes.push(class);
        let class_name = classes.join(" ");
        self.set_attr(node, "class", Some(&class_name));
    }

    /// Replace every child of `node` with a single text node
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        let Some(mut target) = self.html.tree.get_mut(node.0) else {
            return;
        };
        if !target.value().is_element() {
            return;
        }
        while let Some(mut child) = target.first_child() {
            child.detach();
        }
        target.append(Node::Text(Text {
            text: StrTendril::from_slice(text),
        }));
    }

    pub fn set_listener(&mut self, node: NodeId, listener: Listener) {
        if self.get(node).is_some() {
            self.listeners.insert(node, listener);
        }
    }

    pub fn style(&self, node: NodeId) -> Option<&Style> {
        self.get(node).map(Element::style)
    }

    pub fn style_mut(&mut self, node: NodeId) -> Option<&mut Style> {
        self.get(node)?;
        Some(self.styles.entry(node).or_default())
    }

    pub fn apply_patch(&mut self, node: NodeId, patch: &StylePatch) {
        if let Some(style) = self.style_mut(node) {
            style.apply(patch);
        }
    }

    /// Detach `node` from its parent, if any
    pub fn detach(&mut self, node: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(node.0) {
            node.detach();
        }
    }

    /// Whether `child` may be placed under `parent` without creating a cycle
    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        parent != child
            && self.get(parent).is_some()
            && self.get(child).is_some()
            && !self.is_descendant(parent, child)
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Move `child` under `parent`, before `reference` (or last when `None`
    /// or when `reference` is not a child of `parent`)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        let reference = reference.filter(|&r| {
            r != child && self.get(r).and_then(Element::parent) == Some(parent)
        });

        self.detach(child);
        let target = reference.unwrap_or(parent);
        let Some(mut target) = self.html.tree.get_mut(target.0) else {
            return false;
        };
        if reference.is_some() {
            target.insert_id_before(child.0);
        } else {
            target.append_id(child.0);
        }
        true
    }

    /// Put `new_child` where `old_child` sits under `parent`; `old_child`
    /// becomes detached. Returns `false` when `old_child` is not a child of
    /// `parent`.
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> bool {
        if new_child == old_child {
            return true;
        }
        let is_child = self.get(old_child).and_then(Element::parent) == Some(parent);
        if !is_child || !self.can_adopt(parent, new_child) {
            return false;
        }

        self.insert_before(parent, new_child, Some(old_child));
        self.detach(old_child);
        true
    }

    pub fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.element_ref(node)?
            .children()
            .find_map(ElementRef::wrap)
            .map(|child| NodeId(child.id()))
    }

    /// Strict element ancestors of `node`, nearest first
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.get(node).and_then(Element::parent),
        }
    }

    /// `node` and then its ancestors; the path a click bubbles along
    pub fn path_to_root(&self, node: NodeId) -> Vec<NodeId> {
        if self.get(node).is_none() {
            return Vec::new();
        }
        std::iter::once(node).chain(self.ancestors(node)).collect()
    }

    /// Whether `node` is a strict descendant of `ancestor`
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.body || self.is_descendant(node, self.body)
    }

    /// Strict element descendants of `node` in document order
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let Some(element) = self.element_ref(node) else {
            return Vec::new();
        };
        element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|descendant| NodeId(descendant.id()))
            .collect()
    }

    /// First attached element whose `id` attribute equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&node| self.get(node).and_then(Element::id) == Some(id))
    }

    /// Strict descendants of `scope` matching `selector`, in document order.
    /// An unparsable selector matches nothing.
    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let (Some(element), Ok(selector)) = (self.element_ref(scope), Selector::parse(selector)) else {
            return Vec::new();
        };
        element
            .select(&selector)
            .map(|found| NodeId(found.id()))
            .filter(|&found| found != scope)
            .collect()
    }

    /// First strict descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.select(scope, selector).into_iter().next()
    }

    /// All strict descendants of `scope` matching `selector`
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.select(scope, selector)
    }

    /// Concatenated text of `node` and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        self.element_ref(node)
            .map(|element| element.text().collect())
            .unwrap_or_default()
    }

    /// Indented dump of the attached tree with inline styles
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, self.body, 0);
        out
    }

    fn write_outline(&self, out: &mut String, node: NodeId, depth: usize) {
        let Some(element) = self.get(node) else {
            return;
        };
        let _ = write!(out, "{}{}", "  ".repeat(depth), element.tag());
        if let Some(id) = element.id() {
            let _ = write!(out, "#{}", id);
        }
        for class in element.classes() {
            let _ = write!(out, ".{}", class);
        }
        let style = element.style();
        if !style.is_empty() {
            let _ = write!(out, " {{{}}}", style);
        }
        let text = element.own_text();
        if !text.is_empty() {
            let _ = write!(out, " {:?}", text);
        }
        out.push('\n');
        for child in element.children() {
            self.write_outline(out, child, depth + 1);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
