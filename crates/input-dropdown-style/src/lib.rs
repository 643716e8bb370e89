//! CSS selectors, stylesheets and cascade resolution for input-dropdown documents.
//!
//! This crate provides:
//!
//! - **Selectors**: Type, class, ID, attribute, structural pseudo-class, and combinator selectors
//! - **Queries**: `query_selector`, `matches` and `closest` over a [`Document`](input_dropdown_core::Document)
//! - **CSS Parsing**: Load stylesheets from CSS text or `.css` files
//! - **Cascading**: Priority, specificity and inline-style resolution
//!
//! # Example
//!
//! ```
//! use input_dropdown_core::Document;
//! use input_dropdown_style::prelude::*;
//!
//! let doc = Document::new();
//! let list = doc.create_element("div");
//! doc.add_class(list, "menu").unwrap();
//! doc.append_child(doc.body(), list).unwrap();
//!
//! let mut engine = StyleEngine::new();
//! engine.add_stylesheet(StyleSheet::from_css(".menu { display: none; }", StylePriority::Application).unwrap());
//!
//! assert_eq!(doc.query_selector(".menu").unwrap(), Some(list));
//! assert!(!engine.is_displayed(&doc, list));
//! ```

pub mod parser;
pub mod query;
pub mod resolve;
pub mod rules;
pub mod selector;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::parser::{parse_css, parse_selector_list};
    pub use crate::query::DocumentQuery;
    pub use crate::resolve::StyleEngine;
    pub use crate::rules::{Declaration, SheetSource, StylePriority, StyleRule, StyleSheet};
    pub use crate::selector::{
        AttributeOperator, AttributeSelector, Combinator, PseudoClass, Selector, SelectorList, SelectorPart,
        Specificity,
    };
}
