//! Main style resolution engine.

use std::collections::BTreeMap;
use std::path::Path;

use input_dropdown_core::{Document, ElementId};

use crate::resolve::cascade::{CascadeKey, CascadeOrigin};
use crate::rules::{StylePriority, StyleRule, StyleSheet};
use crate::selector::SpecificityWithOrder;

/// The main style resolution engine.
///
/// The engine holds stylesheets ordered by priority and resolves the
/// cascaded value of a property for an element of a [`Document`]. Inline
/// declarations set through [`Document::set_style`] take part in the
/// cascade above every normal sheet declaration.
#[derive(Debug, Default, Clone)]
pub struct StyleEngine {
    /// All registered stylesheets, sorted by priority.
    stylesheets: Vec<StyleSheet>,
}

impl StyleEngine {
    /// Create an engine with no stylesheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stylesheet.
    pub fn add_stylesheet(&mut self, stylesheet: StyleSheet) {
        self.stylesheets.push(stylesheet);
        self.stylesheets.sort_by_key(|s| s.priority);
    }

    /// Remove stylesheets from a specific source file.
    pub fn remove_stylesheet_by_path(&mut self, path: &Path) {
        self.stylesheets.retain(|s| s.source_path() != Some(path));
    }

    /// Clear all stylesheets.
    pub fn clear_stylesheets(&mut self) {
        self.stylesheets.clear();
    }

    /// Number of registered stylesheets.
    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    /// Rules whose selector matches the element, least specific first.
    pub fn matching_rules(&self, document: &Document, element: ElementId) -> Vec<&StyleRule> {
        let mut matched: Vec<(&StyleRule, (StylePriority, SpecificityWithOrder, usize))> = vec![];
        for (sheet_index, sheet) in self.stylesheets.iter().enumerate() {
            matched.extend(
                sheet
                    .matching(document, element)
                    .map(|rule| (rule, (sheet.priority, rule.specificity_with_order(), sheet_index))),
            );
        }
        matched.sort_by_key(|(_, key)| *key);
        matched.into_iter().map(|(rule, _)| rule).collect()
    }

    /// The cascaded value of `property` for the element, if anything sets it.
    pub fn computed_value(&self, document: &Document, element: ElementId, property: &str) -> Option<String> {
        let mut best: Option<(CascadeKey, String)> = None;
        let mut consider = |key: CascadeKey, value: &str| {
            if best.as_ref().is_none_or(|(current, _)| key > *current) {
                best = Some((key, value.to_string()));
            }
        };

        for (sheet_index, sheet) in self.stylesheets.iter().enumerate() {
            for rule in sheet.matching(document, element) {
                let declarations = rule
                    .declarations
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.property == property);
                for (declaration_index, declaration) in declarations {
                    let key = CascadeKey {
                        important: declaration.important,
                        origin: CascadeOrigin::Sheet(sheet.priority),
                        specificity: rule.specificity,
                        sheet_index,
                        rule_order: rule.order,
                        declaration_index,
                    };
                    consider(key, &declaration.value);
                }
            }
        }

        if let Ok(Some(inline)) = document.style(element, property) {
            consider(CascadeKey::inline(), &inline);
        }

        let value = best.map(|(_, value)| value);
        tracing::trace!(
            target: "input_dropdown_style::engine",
            ?element,
            property,
            value = value.as_deref(),
            "computed value"
        );
        value
    }

    /// Every cascaded property of the element.
    pub fn computed_style(&self, document: &Document, element: ElementId) -> BTreeMap<String, String> {
        let mut properties: Vec<String> = self
            .matching_rules(document, element)
            .into_iter()
            .flat_map(|rule| rule.declarations.iter().map(|d| d.property.clone()))
            .collect();
        if let Ok(text) = document.style_text(element) {
            properties.extend(
                text.split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .map(|(name, _)| name.trim().to_string())
                    .filter(|name| !name.is_empty()),
            );
        }
        properties.sort();
        properties.dedup();

        properties
            .into_iter()
            .filter_map(|property| {
                let value = self.computed_value(document, element, &property)?;
                Some((property, value))
            })
            .collect()
    }

    /// Whether the element would be rendered.
    ///
    /// The element must be connected to the document, and neither it nor
    /// any ancestor may compute `display: none`.
    pub fn is_displayed(&self, document: &Document, element: ElementId) -> bool {
        if !document.is_connected(element) {
            return false;
        }
        let ancestors = document.ancestors(element).unwrap_or_default();
        std::iter::once(element)
            .chain(ancestors)
            .all(|id| self.computed_value(document, id, "display").as_deref() != Some("none"))
    }
}
