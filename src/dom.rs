use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile tag-stripping regex"));

/// Handle to an element inside a [`PageDocument`].
///
/// Components capture the handles they need at setup time and never query
/// the document again afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single element of the server-rendered page: tag, id, CSS classes,
/// attributes and the raw markup body.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    markup: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class, keeping the class list duplicate-free.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The element's markup body, the `innerHTML` of the rendered page.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Replace the markup body wholesale. Anything derived from the old
    /// markup is gone after this.
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    pub fn append_markup(&mut self, fragment: &str) {
        self.markup.push_str(fragment);
    }

    /// Visible text of the markup body, tags stripped.
    pub fn text(&self) -> String {
        TAG_RE.replace_all(&self.markup, "").into_owned()
    }
}

/// The element tree the controller operates on, flattened to the lookups
/// the page actually performs: by id, by class, by attribute value.
#[derive(Debug, Default)]
pub struct PageDocument {
    nodes: Vec<Element>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: Element) -> NodeId {
        self.nodes.push(element);
        NodeId(self.nodes.len() - 1)
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0]
    }

    /// First element carrying the given id, if any.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|e| e.id() == Some(id))
            .map(NodeId)
    }

    /// All elements carrying the given class, in document order.
    pub fn by_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(class))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// All elements whose attribute `name` equals `value`.
    pub fn with_attribute(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attr(name) == Some(value))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_and_class() {
        let mut doc = PageDocument::new();
        let input = doc.insert(Element::new("input").with_id("file"));
        let zone = doc.insert(Element::new("div").with_class("upload-area"));
        doc.insert(Element::new("a").with_class("page-nav-link"));
        doc.insert(Element::new("a").with_class("page-nav-link"));

        assert_eq!(doc.by_id("file"), Some(input));
        assert_eq!(doc.by_id("missing"), None);
        assert_eq!(doc.by_class("upload-area"), vec![zone]);
        assert_eq!(doc.by_class("page-nav-link").len(), 2);
    }

    #[test]
    fn class_list_stays_duplicate_free() {
        let mut el = Element::new("div").with_class("upload-area");
        el.add_class("border-primary");
        el.add_class("border-primary");
        assert_eq!(el.classes().len(), 2);

        el.remove_class("border-primary");
        assert!(!el.has_class("border-primary"));
        assert!(el.has_class("upload-area"));
    }

    #[test]
    fn markup_replacement_is_wholesale() {
        let mut el = Element::new("div").with_markup("<p>old</p>");
        el.set_markup("<p>new</p>");
        assert_eq!(el.markup(), "<p>new</p>");

        el.append_markup("<img src=\"x\">");
        assert_eq!(el.markup(), "<p>new</p><img src=\"x\">");
    }

    #[test]
    fn text_strips_tags() {
        let el = Element::new("div").with_markup("<p>The <mark>Cat</mark> sat</p>");
        assert_eq!(el.text(), "The Cat sat");
    }

    #[test]
    fn attribute_lookup() {
        let mut doc = PageDocument::new();
        let flagged = doc.insert(
            Element::new("button")
                .with_attr("data-bs-toggle", "tooltip")
                .with_attr("title", "Upload a scan"),
        );
        doc.insert(Element::new("button"));

        assert_eq!(doc.with_attribute("data-bs-toggle", "tooltip"), vec![flagged]);
        assert_eq!(doc.element(flagged).attr("title"), Some("Upload a scan"));
    }
}
