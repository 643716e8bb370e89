//! CSS specificity calculation.

use super::{PseudoClass, Selector, SelectorPart, TypeSelector};

/// CSS specificity as (a, b, c) tuple.
///
/// - a: ID selectors
/// - b: Class selectors and pseudo-classes
/// - c: Type selectors
///
/// Compared lexicographically: (1,0,0) > (0,99,99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Zero specificity (universal selector).
    pub const ZERO: Self = Self(0, 0, 0);

    /// Calculate specificity of a selector.
    pub fn of_selector(selector: &Selector) -> Self {
        let mut spec = Self::ZERO;
        for part in &selector.parts {
            spec.add_part(part);
        }
        spec
    }

    /// Calculate specificity of a selector part.
    pub fn of_part(part: &SelectorPart) -> Self {
        let mut spec = Self::ZERO;
        spec.add_part(part);
        spec
    }

    fn add_part(&mut self, part: &SelectorPart) {
        if part.id.is_some() {
            self.0 += 1;
        }

        self.1 += (part.classes.len() + part.attributes.len()) as u32;

        for pseudo in &part.pseudo_classes {
            match pseudo {
                // :not() counts as its argument
                PseudoClass::Not(inner) => self.add_part(inner),
                _ => self.1 += 1,
            }
        }

        if let Some(TypeSelector::Type(_)) = &part.type_selector {
            self.2 += 1;
        }
    }

    /// Get the ID selector count.
    pub fn ids(&self) -> u32 {
        self.0
    }

    /// Get the class/pseudo-class count.
    pub fn classes(&self) -> u32 {
        self.1
    }

    /// Get the type selector count.
    pub fn types(&self) -> u32 {
        self.2
    }

    /// Combine with source order for complete ordering.
    pub fn with_order(self, order: u32) -> SpecificityWithOrder {
        SpecificityWithOrder {
            specificity: self,
            order,
        }
    }
}

impl std::fmt::Display for Specificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// Specificity combined with source order for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpecificityWithOrder {
    /// The CSS specificity value.
    pub specificity: Specificity,
    /// Source order for tie-breaking (higher = later in stylesheet).
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specificity_calculation() {
        assert_eq!(Specificity::of_selector(&Selector::universal()), Specificity(0, 0, 0));
        assert_eq!(Specificity::of_selector(&Selector::type_selector("div")), Specificity(0, 0, 1));
        assert_eq!(Specificity::of_selector(&Selector::class("item")), Specificity(0, 1, 0));
        assert_eq!(Specificity::of_selector(&Selector::id("search")), Specificity(1, 0, 0));

        // div.item:first-child .title -> (0,3,1)
        let sel = Selector {
            parts: vec![
                SelectorPart::type_only("div")
                    .with_class("item")
                    .with_pseudo(PseudoClass::FirstChild),
                SelectorPart::class_only("title"),
            ],
            combinators: vec![crate::selector::Combinator::Descendant],
        };
        assert_eq!(Specificity::of_selector(&sel), Specificity(0, 3, 1));
    }

    #[test]
    fn specificity_comparison() {
        assert!(Specificity(1, 0, 0) > Specificity(0, 99, 99));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 99));
        assert!(Specificity(0, 0, 1) > Specificity(0, 0, 0));
        assert!(Specificity(0, 2, 0) > Specificity(0, 1, 0));
    }

    #[test]
    fn specificity_with_order() {
        let s1 = Specificity(0, 1, 0).with_order(1);
        let s2 = Specificity(0, 1, 0).with_order(2);
        let s3 = Specificity(0, 2, 0).with_order(0);

        assert!(s3 > s1);
        assert!(s3 > s2);
        assert!(s2 > s1);
    }

    #[test]
    fn attribute_counts_as_class() {
        let part = SelectorPart::type_only("input")
            .with_attribute(crate::selector::AttributeSelector::present("name"));
        assert_eq!(Specificity::of_part(&part), Specificity(0, 1, 1));
    }

    #[test]
    fn not_pseudo_class_specificity() {
        let part = SelectorPart::new().with_pseudo(PseudoClass::Not(Box::new(SelectorPart::id_only("x"))));
        assert_eq!(Specificity::of_part(&part), Specificity(1, 0, 0));
    }
}
