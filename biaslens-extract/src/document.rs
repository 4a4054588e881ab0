//! Mutable view over a parsed HTML page.
//!
//! Class and attribute writes go straight into the parsed tree, so every
//! write is visible to later reads and to [`Document::to_html`].

use crate::block::PositionId;
use biaslens_common::{BiasLensError, Result};
use ego_tree::iter::Edge;
use ego_tree::NodeId;
use html5ever::{ns, Attribute, LocalName, QualName};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;

/// Attribute carrying the position tag written by the orchestrator.
pub const POSITION_ATTR: &str = "data-bias-pos";

const NON_RENDERED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Stable reference to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(NodeId);

pub struct Document {
    html: Html,
    positions: HashMap<PositionId, NodeId>,
}

/// Parse a CSS selector, reporting failures as configuration errors.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| BiasLensError::Config(format!("invalid selector {css:?}: {e:?}")))
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            positions: HashMap::new(),
        }
    }

    /// Parse errors recovered from by the HTML parser.
    pub fn parse_errors(&self) -> usize {
        self.html.errors.len()
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementHandle {
        ElementHandle(self.html.root_element().id())
    }

    pub fn select(&self, selector: &Selector) -> Vec<ElementHandle> {
        self.html
            .select(selector)
            .map(|el| ElementHandle(el.id()))
            .collect()
    }

    pub fn select_css(&self, css: &str) -> Result<Vec<ElementHandle>> {
        Ok(self.select(&selector(css)?))
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementHandle> {
        self.html.select(selector).next().map(|el| ElementHandle(el.id()))
    }

    /// Descendants of `scope` matching `selector`, in document order.
    pub fn select_within(&self, scope: ElementHandle, selector: &Selector) -> Vec<ElementHandle> {
        self.element(scope)
            .map(|el| el.select(selector).map(|e| ElementHandle(e.id())).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, scope: ElementHandle, selector: &Selector) -> bool {
        self.element(scope)
            .is_some_and(|el| el.select(selector).next().is_some())
    }

    /// Element children of `handle`, skipping text and comment nodes.
    pub fn children(&self, handle: ElementHandle) -> Vec<ElementHandle> {
        self.element(handle)
            .map(|el| {
                el.children()
                    .filter_map(ElementRef::wrap)
                    .map(|e| ElementHandle(e.id()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any element ancestor of `handle` has the given tag name.
    pub fn has_ancestor(&self, handle: ElementHandle, tag: &str) -> bool {
        self.html.tree.get(handle.0).is_some_and(|node| {
            node.ancestors()
                .filter_map(|a| a.value().as_element())
                .any(|e| e.name() == tag)
        })
    }

    pub fn tag_name(&self, handle: ElementHandle) -> Option<&str> {
        self.element(handle).map(|el| el.value().name())
    }

    pub fn attr(&self, handle: ElementHandle, name: &str) -> Option<String> {
        self.element(handle)?.value().attr(name).map(str::to_string)
    }

    pub fn classes(&self, handle: ElementHandle) -> Vec<String> {
        self.element(handle)
            .map(|el| el.value().classes().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, handle: ElementHandle, class: &str) -> bool {
        self.element(handle)
            .is_some_and(|el| el.value().classes().any(|c| c == class))
    }

    /// Add a class; returns false if it was already present.
    pub fn add_class(&mut self, handle: ElementHandle, class: &str) -> bool {
        if self.element(handle).is_none() || self.has_class(handle, class) {
            return false;
        }
        self.rewrite_attrs(handle, |attrs| {
            match attrs.iter_mut().find(|a| is_plain(&a.name, "class")) {
                Some(existing) => {
                    let mut value = existing.value.to_string();
                    if !value.trim().is_empty() {
                        value.push(' ');
                    }
                    value.push_str(class);
                    existing.value = value.as_str().into();
                }
                None => attrs.push(plain_attr("class", class)),
            }
        });
        true
    }

    pub fn set_attr(&mut self, handle: ElementHandle, name: &str, value: &str) {
        if name == "class" {
            for class in value.split_whitespace() {
                self.add_class(handle, class);
            }
            return;
        }
        self.rewrite_attrs(handle, |attrs| {
            match attrs.iter_mut().find(|a| is_plain(&a.name, name)) {
                Some(existing) => existing.value = value.into(),
                None => attrs.push(plain_attr(name, value)),
            }
        });
    }

    /// Rebuild the element behind `handle` from an edited attribute list.
    ///
    /// Elements cache their id and class lists, so edits replace the node
    /// value instead of touching `attrs` in place.
    fn rewrite_attrs(&mut self, handle: ElementHandle, edit: impl FnOnce(&mut Vec<Attribute>)) {
        let Some(mut node) = self.html.tree.get_mut(handle.0) else {
            return;
        };
        let Node::Element(el) = node.value() else {
            return;
        };
        let mut attrs: Vec<Attribute> = el
            .attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        edit(&mut attrs);
        *el = Element::new(el.name.clone(), attrs);
    }

    /// Detach an element (and its subtree) from the page.
    pub fn remove(&mut self, handle: ElementHandle) -> bool {
        if !self.is_attached(handle) {
            return false;
        }
        match self.html.tree.get_mut(handle.0) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self, handle: ElementHandle) -> bool {
        let root = self.html.tree.root().id();
        self.html
            .tree
            .get(handle.0)
            .is_some_and(|node| node.ancestors().any(|a| a.id() == root))
    }

    /// Start a new tagging pass. Positions from earlier passes stop resolving.
    pub fn begin_pass(&mut self) {
        self.positions.clear();
    }

    pub fn tag_position(&mut self, handle: ElementHandle, position: PositionId) {
        self.set_attr(handle, POSITION_ATTR, &position.to_string());
        self.positions.insert(position, handle.0);
    }

    pub fn position_of(&self, handle: ElementHandle) -> Option<PositionId> {
        self.attr(handle, POSITION_ATTR)?.parse().ok()
    }

    /// Resolve a position tagged in the current pass.
    ///
    /// Returns `None` when the element was removed from the page or its
    /// position attribute no longer matches.
    pub fn element_at_position(&self, position: PositionId) -> Option<ElementHandle> {
        let handle = ElementHandle(*self.positions.get(&position)?);
        if !self.is_attached(handle) || self.position_of(handle) != Some(position) {
            return None;
        }
        Some(handle)
    }

    pub fn tagged_count(&self) -> usize {
        self.positions.len()
    }

    /// Concatenated descendant text with whitespace runs collapsed.
    pub fn text_content(&self, handle: ElementHandle) -> String {
        self.element(handle)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default()
    }

    /// Descendant text exactly as it appears in the source.
    pub fn raw_text(&self, handle: ElementHandle) -> String {
        self.element(handle)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    /// Text a reader would see: hidden subtrees, scripts and styles are skipped.
    pub fn rendered_text(&self, handle: ElementHandle) -> String {
        let Some(el) = self.element(handle) else {
            return String::new();
        };
        if !is_rendered(el.value()) {
            return String::new();
        }
        let mut out = String::new();
        let mut hidden_depth = 0usize;
        for edge in el.traverse() {
            match edge {
                Edge::Open(node) => {
                    if hidden_depth > 0 {
                        if node.value().is_element() {
                            hidden_depth += 1;
                        }
                        continue;
                    }
                    match node.value() {
                        Node::Element(e) if !is_rendered(e) => hidden_depth = 1,
                        Node::Element(e) if e.name() == "br" => out.push(' '),
                        Node::Text(t) => out.push_str(t),
                        _ => {}
                    }
                }
                Edge::Close(node) => {
                    if hidden_depth > 0 && node.value().is_element() {
                        hidden_depth -= 1;
                    }
                }
            }
        }
        collapse_whitespace(&out)
    }

    /// Serialize the page with every class and attribute written so far.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// Borrow the parsed element behind `handle`.
    pub fn element(&self, handle: ElementHandle) -> Option<ElementRef<'_>> {
        self.html.tree.get(handle.0).and_then(ElementRef::wrap)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("tagged", &self.positions.len())
            .finish()
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_rendered(e: &Element) -> bool {
    if NON_RENDERED_ELEMENTS.contains(&e.name()) || e.attr("hidden").is_some() {
        return false;
    }
    if e.attr("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return false;
    }
    match e.attr("style") {
        Some(style) => {
            let style: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            !style.contains("display:none") && !style.contains("visibility:hidden")
        }
        None => true,
    }
}

fn is_plain(name: &QualName, local: &str) -> bool {
    name.ns == ns!() && name.prefix.is_none() && &*name.local == local
}

fn plain_attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.into(),
    }
}
