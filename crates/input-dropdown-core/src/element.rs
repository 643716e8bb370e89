//! Element storage.

use slotmap::new_key_type;

use crate::geometry::Rect;

new_key_type! {
    /// A unique identifier for an element in a [`Document`](crate::Document).
    ///
    /// `ElementId`s are stable handles that remain valid while the element is
    /// moved around the tree or detached. They become invalid when the element
    /// is destroyed.
    pub struct ElementId;
}

impl ElementId {
    /// Convert the id to a raw u64 value, e.g. for log fields.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// Leaf content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Plain text. Escaped when read back as markup.
    Text(String),
    /// Raw markup inserted verbatim. Never parsed or sanitized.
    Markup(String),
}

impl Content {
    /// The content as markup.
    pub fn to_markup(&self) -> String {
        match self {
            Self::Text(text) => escape_html(text),
            Self::Markup(markup) => markup.clone(),
        }
    }

    /// The content as plain text. Tags are stripped from raw markup.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Markup(markup) => strip_tags(markup),
        }
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Internal data stored in the document arena for each element.
#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    /// Lower-case tag name.
    pub(crate) tag: String,
    /// The `id` attribute.
    pub(crate) id: Option<String>,
    /// Class list, in insertion order, without duplicates.
    pub(crate) classes: Vec<String>,
    /// Inline style declarations, in insertion order.
    pub(crate) style: Vec<(String, String)>,
    /// Other attributes.
    pub(crate) attributes: Vec<(String, String)>,
    /// Parent element (if attached).
    pub(crate) parent: Option<ElementId>,
    /// Child elements, in document order.
    pub(crate) children: Vec<ElementId>,
    /// Leaf content.
    pub(crate) content: Option<Content>,
    /// Current value for form controls.
    pub(crate) value: String,
    /// Layout box as last reported by the embedder.
    pub(crate) layout: Rect,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            style: Vec::new(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            content: None,
            value: String::new(),
            layout: Rect::ZERO,
        }
    }

    pub(crate) fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
