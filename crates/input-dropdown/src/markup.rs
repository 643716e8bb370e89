//! How record text is inserted into item elements.

use input_dropdown_core::{Document, DomResult, ElementId};
use serde::{Deserialize, Serialize};

/// Insertion policy for title and subtitle text and the icon URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupMode {
    /// Insert text as text and quote the icon URL.
    #[default]
    Text,
    /// Insert field values as raw markup and splice the icon URL unquoted.
    ///
    /// Field values are trusted as-is; only use this with sanitized data.
    Raw,
}

impl MarkupMode {
    /// Set the content of a text slot.
    pub fn apply(self, document: &Document, element: ElementId, value: String) -> DomResult<()> {
        match self {
            Self::Text => document.set_text_content(element, value),
            Self::Raw => document.set_inner_markup(element, value),
        }
    }

    /// The `background-image` value for an icon URL.
    pub fn background_image(self, url: &str) -> String {
        match self {
            Self::Text => format!("url(\"{}\")", escape_css_string(url)),
            Self::Raw => format!("url({})", url),
        }
    }
}

/// Escape a value for use inside a double-quoted CSS string.
pub fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            _ => out.push(ch),
        }
    }
    out
}
