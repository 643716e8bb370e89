//! Logging and debugging facilities.
//!
//! This module provides:
//! - Target names for filtering the crate family's `tracing` output by subsystem
//! - Debug visualization for element trees
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! All crates in the family log through `tracing`. Install a subscriber in
//! the embedding application to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("input_dropdown=debug,input_dropdown_core::mutation=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! Use [`DocumentTreeDebug`] to dump the element hierarchy:
//!
//! ```
//! use input_dropdown_core::{Document, logging::DocumentTreeDebug};
//!
//! let doc = Document::new();
//! let output = DocumentTreeDebug::new().format_all(&doc).unwrap();
//! assert!(output.contains("body"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::document::Document;
use crate::element::ElementId;
use crate::error::DomResult;

/// Span names used for tracing.
pub mod span_names {
    /// Event dispatch span.
    pub const DISPATCH: &str = "input_dropdown::dispatch";
    /// Mutation delivery span.
    pub const MUTATION: &str = "input_dropdown::mutation";
    /// Signal emission span.
    pub const SIGNAL: &str = "input_dropdown::signal";
    /// Dropdown rendering span.
    pub const RENDER: &str = "input_dropdown::render";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "input_dropdown_core";
    /// Element tree target.
    pub const DOCUMENT: &str = "input_dropdown_core::document";
    /// Event listener and dispatch target.
    pub const EVENTS: &str = "input_dropdown_core::events";
    /// Mutation observation target.
    pub const MUTATION: &str = "input_dropdown_core::mutation";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "input_dropdown_core::signal";
    /// Performance spans.
    pub const PERF: &str = "input_dropdown::perf";
}

/// Style options for element tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for element tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show element IDs.
    pub show_ids: bool,
    /// Whether to show `#id` and `.class` decorations.
    pub show_selectors: bool,
    /// Whether to show inline styles.
    pub show_styles: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_selectors: true,
            show_styles: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_styles: true,
            ..Default::default()
        }
    }

    /// Options for minimal output (tag names only).
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_selectors: false,
            show_styles: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing element trees.
#[derive(Debug, Clone, Default)]
pub struct DocumentTreeDebug {
    options: TreeFormatOptions,
}

impl DocumentTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the whole document starting from the root element.
    pub fn format_all(&self, doc: &Document) -> DomResult<String> {
        let mut output = String::new();
        let _ = writeln!(output, "Document ({} elements):", doc.element_count());
        self.format_subtree_into(doc, doc.document_element(), 0, true, &mut output)?;
        Ok(output)
    }

    /// Format a subtree starting from a specific element.
    pub fn format_subtree(&self, doc: &Document, root: ElementId) -> DomResult<String> {
        let mut output = String::new();
        self.format_subtree_into(doc, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        doc: &Document,
        id: ElementId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> DomResult<()> {
        if let Some(max) = self.options.max_depth
            && depth > max
        {
            return Ok(());
        }

        let info = doc.element_info(id)?;
        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(&info.tag);

        if self.options.show_selectors {
            if let Some(element_id) = &info.id {
                let _ = write!(output, "#{element_id}");
            }
            for class in &info.classes {
                let _ = write!(output, ".{class}");
            }
        }

        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", id);
        }

        if self.options.show_styles {
            let style = doc.style_text(id)?;
            if !style.is_empty() {
                let _ = write!(output, " {{{style}}}");
            }
        }

        output.push('\n');

        let children = doc.children(id)?;
        let child_count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_subtree_into(doc, child, depth + 1, i == child_count - 1, output)?;
        }

        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => (
                "\u{2502}",
                "\u{251c}\u{2500}\u{2500}",
                "\u{2514}\u{2500}\u{2500}",
            ),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of an operation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "input_dropdown::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId) {
        let doc = Document::new();
        let list = doc.create_element("div");
        doc.set_element_id(list, "list").unwrap();
        doc.add_class(list, "menu").unwrap();
        doc.set_style(list, "display", "block").unwrap();
        doc.append_child(doc.body(), list).unwrap();
        for _ in 0..2 {
            let item = doc.create_element("span");
            doc.append_child(list, item).unwrap();
        }
        (doc, list)
    }

    #[test]
    fn format_all_lists_every_element() {
        let (doc, _) = sample();
        let output = DocumentTreeDebug::new().format_all(&doc).unwrap();
        assert!(output.starts_with("Document (5 elements):"));
        assert!(output.contains("html\n"));
        assert!(output.contains("div#list.menu"));
        assert_eq!(output.matches("span").count(), 2);
    }

    #[test]
    fn minimal_hides_selectors() {
        let (doc, list) = sample();
        let debug = DocumentTreeDebug::with_options(TreeFormatOptions::minimal());
        let output = debug.format_subtree(&doc, list).unwrap();
        assert!(output.starts_with("div\n"));
        assert!(!output.contains("#list"));
    }

    #[test]
    fn detailed_shows_styles() {
        let (doc, list) = sample();
        let debug = DocumentTreeDebug::with_options(TreeFormatOptions::detailed());
        let output = debug.format_subtree(&doc, list).unwrap();
        assert!(output.contains("{display: block;}"));
    }

    #[test]
    fn ascii_prefixes() {
        let (doc, list) = sample();
        let debug = DocumentTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        });
        let output = debug.format_subtree(&doc, list).unwrap();
        assert_eq!(output, "div\n+-- span\n`-- span\n");
    }

    #[test]
    fn perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
