//! Selector queries over a [`Document`].

use input_dropdown_core::{Document, ElementId};

use crate::Result;
use crate::parser::parse_selector_list;
use crate::selector::{SelectorList, matches_list};

/// `querySelector`-style lookups.
///
/// The string forms parse the selector list on every call and fail on an
/// invalid selector; the `_parsed` forms take a pre-parsed list.
pub trait DocumentQuery {
    /// First element in document order matching the selectors.
    fn query_selector(&self, selectors: &str) -> Result<Option<ElementId>> {
        Ok(self.query_selector_parsed(&parse_selector_list(selectors)?))
    }

    /// Every element in document order matching the selectors.
    fn query_selector_all(&self, selectors: &str) -> Result<Vec<ElementId>> {
        Ok(self.query_selector_all_parsed(&parse_selector_list(selectors)?))
    }

    /// Whether the element matches the selectors.
    fn matches(&self, element: ElementId, selectors: &str) -> Result<bool> {
        Ok(self.matches_parsed(element, &parse_selector_list(selectors)?))
    }

    /// The element itself or its nearest ancestor matching the selectors.
    fn closest(&self, element: ElementId, selectors: &str) -> Result<Option<ElementId>> {
        Ok(self.closest_parsed(element, &parse_selector_list(selectors)?))
    }

    /// First match for a parsed selector list.
    fn query_selector_parsed(&self, selectors: &SelectorList) -> Option<ElementId> {
        self.query_selector_all_parsed(selectors).into_iter().next()
    }

    /// Every match for a parsed selector list.
    fn query_selector_all_parsed(&self, selectors: &SelectorList) -> Vec<ElementId>;

    /// Whether the element matches a parsed selector list.
    fn matches_parsed(&self, element: ElementId, selectors: &SelectorList) -> bool;

    /// Closest inclusive ancestor matching a parsed selector list.
    fn closest_parsed(&self, element: ElementId, selectors: &SelectorList) -> Option<ElementId>;
}

impl DocumentQuery for Document {
    fn query_selector_parsed(&self, selectors: &SelectorList) -> Option<ElementId> {
        self.depth_first_preorder(self.document_element())
            .unwrap_or_default()
            .into_iter()
            .find(|&id| matches_list(selectors, self, id))
    }

    fn query_selector_all_parsed(&self, selectors: &SelectorList) -> Vec<ElementId> {
        self.depth_first_preorder(self.document_element())
            .unwrap_or_default()
            .into_iter()
            .filter(|&id| matches_list(selectors, self, id))
            .collect()
    }

    fn matches_parsed(&self, element: ElementId, selectors: &SelectorList) -> bool {
        matches_list(selectors, self, element)
    }

    fn closest_parsed(&self, element: ElementId, selectors: &SelectorList) -> Option<ElementId> {
        let ancestors = self.ancestors(element).ok()?;
        std::iter::once(element)
            .chain(ancestors)
            .find(|&id| matches_list(selectors, self, id))
    }
}
