//! Stylesheets and where they come from.

use std::path::{Path, PathBuf};

use input_dropdown_core::{Document, ElementId};

use crate::rules::{Declaration, StyleRule};
use crate::selector::{Selector, matches_full};
use crate::{Error, Result};

/// Cascade level of a stylesheet. Later levels override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum StylePriority {
    /// Defaults bundled with a widget.
    Widget = 0,
    /// The embedding application's sheet.
    Application = 1,
    /// End-user overrides.
    User = 2,
}

/// Where a stylesheet's rules were read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSource {
    /// Built in code or parsed from a string.
    #[default]
    Text,
    /// Loaded from a `.css` file.
    File(PathBuf),
}

/// An ordered list of rules at one [`StylePriority`].
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Rules in source order.
    pub rules: Vec<StyleRule>,
    /// Cascade level.
    pub priority: StylePriority,
    /// Origin of the rules.
    pub source: SheetSource,
}

impl StyleSheet {
    /// An empty sheet.
    pub fn new(priority: StylePriority) -> Self {
        Self {
            rules: Vec::new(),
            priority,
            source: SheetSource::Text,
        }
    }

    /// Parse CSS text.
    pub fn from_css(css: &str, priority: StylePriority) -> Result<Self> {
        let rules = crate::parser::parse_css(css)?;
        tracing::debug!(target: "input_dropdown_style::stylesheet", rules = rules.len(), ?priority, "parsed stylesheet");
        Ok(Self {
            rules,
            priority,
            source: SheetSource::Text,
        })
    }

    /// Read and parse a CSS file.
    pub fn from_file(path: impl AsRef<Path>, priority: StylePriority) -> Result<Self> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            source: SheetSource::File(path.to_path_buf()),
            ..Self::from_css(&css, priority)?
        })
    }

    /// The file the sheet was loaded from.
    pub fn source_path(&self) -> Option<&Path> {
        match &self.source {
            SheetSource::File(path) => Some(path),
            SheetSource::Text => None,
        }
    }

    /// Append a rule; its order is its position in the sheet.
    pub fn add_rule(&mut self, selector: Selector, declarations: Vec<Declaration>) -> &mut Self {
        let order = u32::try_from(self.rules.len()).unwrap_or(u32::MAX);
        self.rules.push(StyleRule::new(selector, declarations, order));
        self
    }

    /// Rules whose selector matches the element, in source order.
    pub fn matching<'a, 'd>(
        &'a self,
        document: &'d Document,
        element: ElementId,
    ) -> impl Iterator<Item = &'a StyleRule> + use<'a, 'd> {
        self.rules
            .iter()
            .filter(move |rule| matches_full(&rule.selector, document, element))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the sheet has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rules_are_ordered_as_added() {
        let mut sheet = StyleSheet::new(StylePriority::Application);
        assert!(sheet.is_empty());

        sheet
            .add_rule(Selector::class("a"), vec![Declaration::new("color", "red")])
            .add_rule(Selector::class("b"), vec![]);

        let orders: Vec<u32> = sheet.rules.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(sheet.source, SheetSource::Text);
    }

    #[test]
    fn priority_levels() {
        assert!(StylePriority::User > StylePriority::Application);
        assert!(StylePriority::Application > StylePriority::Widget);
    }

    #[test]
    fn matching_filters_by_selector() {
        let doc = Document::new();
        let item = doc.create_element("div");
        doc.add_class(item, "item").unwrap();
        doc.append_child(doc.body(), item).unwrap();

        let sheet = StyleSheet::from_css(
            ".item { color: red; } span { color: blue; } div.item { width: 1px; }",
            StylePriority::Widget,
        )
        .unwrap();
        let matched: Vec<u32> = sheet.matching(&doc, item).map(|r| r.order).collect();
        assert_eq!(matched, vec![0, 2]);
    }

    #[test]
    fn matched_rules_outlive_the_document_borrow() {
        let sheet = StyleSheet::from_css(".item { color: red; }", StylePriority::Widget).unwrap();
        let rules: Vec<&StyleRule> = {
            let doc = Document::new();
            let item = doc.create_element("div");
            doc.add_class(item, "item").unwrap();
            doc.append_child(doc.body(), item).unwrap();
            sheet.matching(&doc, item).collect()
        };
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations[0].value, "red");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".css").tempfile().unwrap();
        writeln!(file, ".menu {{ display: none; }}").unwrap();

        let sheet = StyleSheet::from_file(file.path(), StylePriority::User).unwrap();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.source_path(), Some(file.path()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = StyleSheet::from_file("/definitely/not/here.css", StylePriority::User);
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
