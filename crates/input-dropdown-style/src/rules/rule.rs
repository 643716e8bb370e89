//! Single style rule definition.

use crate::selector::{Selector, Specificity, SpecificityWithOrder};

/// A single `property: value` pair. Values are kept as CSS source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-case property name.
    pub property: String,
    /// The value as written, without `!important`.
    pub value: String,
    /// Whether the declaration was marked `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a normal declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Mark the declaration `!important`.
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// A style rule mapping a selector to declarations.
///
/// Each rule has:
/// - A selector that determines which elements it applies to
/// - Declarations to apply when the selector matches
/// - Pre-computed specificity for efficient sorting
/// - Source order for tie-breaking
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// The selector for matching elements.
    pub selector: Selector,
    /// The declarations to apply, in source order.
    pub declarations: Vec<Declaration>,
    /// Pre-computed specificity.
    pub specificity: Specificity,
    /// Source order (for tie-breaking when specificity is equal).
    pub order: u32,
}

impl StyleRule {
    /// Create a new style rule.
    pub fn new(selector: Selector, declarations: Vec<Declaration>, order: u32) -> Self {
        let specificity = Specificity::of_selector(&selector);
        Self {
            selector,
            declarations,
            specificity,
            order,
        }
    }

    /// Create a rule with a type selector.
    pub fn for_type(tag: impl Into<String>, declarations: Vec<Declaration>, order: u32) -> Self {
        Self::new(Selector::type_selector(tag), declarations, order)
    }

    /// Create a rule with a class selector.
    pub fn for_class(class: impl Into<String>, declarations: Vec<Declaration>, order: u32) -> Self {
        Self::new(Selector::class(class), declarations, order)
    }

    /// Create a rule with an ID selector.
    pub fn for_id(id: impl Into<String>, declarations: Vec<Declaration>, order: u32) -> Self {
        Self::new(Selector::id(id), declarations, order)
    }

    /// The last declaration of `property` in this rule.
    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        self.declarations.iter().rev().find(|d| d.property == property)
    }

    /// Get the specificity with source order for comparison.
    pub fn specificity_with_order(&self) -> SpecificityWithOrder {
        self.specificity.with_order(self.order)
    }
}
