//! Selector matching algorithm.

use std::borrow::Cow;

use input_dropdown_core::{Document, ElementId, ElementInfo};

use super::{Combinator, PseudoClass, Selector, SelectorList, SelectorPart, TypeSelector};

/// The facts about one element a compound selector is matched against.
#[derive(Debug, Clone, Default)]
pub struct ElementMatchContext<'a> {
    /// Lower-case tag name (e.g., "input", "div").
    pub tag: &'a str,
    /// The element's `id` attribute (for #id selectors).
    pub id: Option<&'a str>,
    /// The element's classes.
    pub classes: &'a [String],
    /// Plain attributes (for `[name=value]` selectors).
    pub attributes: &'a [(String, String)],
    /// Sibling information for structural pseudo-classes.
    pub sibling_info: Option<SiblingInfo>,
    /// Number of child elements (for :empty).
    pub child_count: usize,
}

impl<'a> ElementMatchContext<'a> {
    /// Build a context from a document snapshot of the element.
    pub fn from_info(info: &'a ElementInfo) -> Self {
        Self {
            tag: &info.tag,
            id: info.id.as_deref(),
            classes: &info.classes,
            attributes: &info.attributes,
            sibling_info: info.parent.map(|_| SiblingInfo {
                index: info.sibling_index,
                count: info.sibling_count,
            }),
            child_count: info.child_count,
        }
    }
}

impl ElementMatchContext<'_> {
    /// Value of an attribute. `id` and `class` are read from their dedicated
    /// fields.
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => self.id.map(Cow::Borrowed),
            "class" if self.classes.is_empty() => None,
            "class" => Some(Cow::Owned(self.classes.join(" "))),
            _ => self
                .attributes
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| Cow::Borrowed(v.as_str())),
        }
    }
}

/// Sibling position information.
#[derive(Debug, Clone, Copy)]
pub struct SiblingInfo {
    /// Zero-based index among siblings.
    pub index: usize,
    /// Total number of siblings (including self).
    pub count: usize,
}

impl SiblingInfo {
    /// Returns true if this is the first sibling.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true if this is the last sibling.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    /// Returns true if this is the only child.
    pub fn is_only(&self) -> bool {
        self.count == 1
    }
}

/// Selector matching engine.
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Check if a selector's subject (rightmost part) matches the element.
    ///
    /// This only checks the final selector part. For full matching with
    /// combinators, use [`matches_full`].
    pub fn matches_subject(selector: &Selector, context: &ElementMatchContext<'_>) -> bool {
        selector
            .subject()
            .is_some_and(|subject| Self::part_matches(subject, context))
    }

    /// Check if a selector part matches the element.
    pub fn part_matches(part: &SelectorPart, context: &ElementMatchContext<'_>) -> bool {
        if let Some(TypeSelector::Type(name)) = &part.type_selector
            && name != context.tag
        {
            return false;
        }

        if let Some(id) = &part.id {
            match context.id {
                Some(element_id) if element_id == id => {}
                _ => return false,
            }
        }

        if !part
            .classes
            .iter()
            .all(|class| context.classes.iter().any(|c| c == class))
        {
            return false;
        }

        if !part
            .attributes
            .iter()
            .all(|attribute| attribute.matches(context.attribute(&attribute.name).as_deref()))
        {
            return false;
        }

        part.pseudo_classes
            .iter()
            .all(|pseudo| Self::pseudo_matches(pseudo, context))
    }

    fn pseudo_matches(pseudo: &PseudoClass, context: &ElementMatchContext<'_>) -> bool {
        match pseudo {
            PseudoClass::FirstChild => context.sibling_info.is_some_and(|s| s.is_first()),
            PseudoClass::LastChild => context.sibling_info.is_some_and(|s| s.is_last()),
            PseudoClass::OnlyChild => context.sibling_info.is_some_and(|s| s.is_only()),
            PseudoClass::NthChild(expr) => context.sibling_info.is_some_and(|s| expr.matches(s.index)),
            PseudoClass::Empty => context.child_count == 0,
            PseudoClass::Not(inner) => !Self::part_matches(inner, context),
        }
    }
}

/// Tree access needed to resolve combinators.
pub trait ElementTree {
    /// Snapshot of the element, or `None` if it no longer exists.
    fn element_info(&self, element: ElementId) -> Option<ElementInfo>;

    /// Siblings preceding the element, nearest first.
    fn previous_siblings(&self, element: ElementId) -> Vec<ElementId>;
}

impl ElementTree for Document {
    fn element_info(&self, element: ElementId) -> Option<ElementInfo> {
        Document::element_info(self, element).ok()
    }

    fn previous_siblings(&self, element: ElementId) -> Vec<ElementId> {
        let Ok(Some(parent)) = self.parent(element) else {
            return Vec::new();
        };
        let siblings = self.children(parent).unwrap_or_default();
        let index = siblings.iter().position(|&s| s == element).unwrap_or(0);
        siblings[..index].iter().rev().copied().collect()
    }
}

/// Check if a full selector matches, considering combinators.
///
/// The selector is walked from right to left; descendant and general-sibling
/// combinators backtrack over every candidate.
pub fn matches_full<T: ElementTree + ?Sized>(selector: &Selector, tree: &T, element: ElementId) -> bool {
    if selector.parts.is_empty() {
        return false;
    }
    matches_from(selector, selector.parts.len() - 1, tree, element)
}

/// Check if any selector of the list matches.
pub fn matches_list<T: ElementTree + ?Sized>(list: &SelectorList, tree: &T, element: ElementId) -> bool {
    list.selectors()
        .iter()
        .any(|selector| matches_full(selector, tree, element))
}

fn matches_from<T: ElementTree + ?Sized>(
    selector: &Selector,
    index: usize,
    tree: &T,
    element: ElementId,
) -> bool {
    let Some(info) = tree.element_info(element) else {
        return false;
    };
    if !SelectorMatcher::part_matches(&selector.parts[index], &ElementMatchContext::from_info(&info)) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Descendant => {
            let mut current = info.parent;
            while let Some(ancestor) = current {
                if matches_from(selector, next, tree, ancestor) {
                    return true;
                }
                current = tree.element_info(ancestor).and_then(|i| i.parent);
            }
            false
        }
        Combinator::Child => info
            .parent
            .is_some_and(|parent| matches_from(selector, next, tree, parent)),
        Combinator::AdjacentSibling => tree
            .previous_siblings(element)
            .first()
            .is_some_and(|&prev| matches_from(selector, next, tree, prev)),
        Combinator::GeneralSibling => tree
            .previous_siblings(element)
            .into_iter()
            .any(|prev| matches_from(selector, next, tree, prev)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{AttributeOperator, AttributeSelector, NthExpr};

    fn make_context<'a>(tag: &'a str, classes: &'a [String]) -> ElementMatchContext<'a> {
        ElementMatchContext {
            tag,
            id: None,
            classes,
            attributes: &[],
            sibling_info: None,
            child_count: 0,
        }
    }

    #[test]
    fn type_selector_matches() {
        let classes = vec![];
        let context = make_context("input", &classes);

        assert!(SelectorMatcher::part_matches(&SelectorPart::type_only("input"), &context));
        assert!(SelectorMatcher::part_matches(&SelectorPart::type_only("INPUT"), &context));
        assert!(!SelectorMatcher::part_matches(&SelectorPart::type_only("div"), &context));
        assert!(SelectorMatcher::part_matches(&SelectorPart::universal(), &context));
    }

    #[test]
    fn class_selector_matches() {
        let classes = vec!["primary".to_string(), "large".to_string()];
        let context = make_context("div", &classes);

        assert!(SelectorMatcher::part_matches(&SelectorPart::class_only("primary"), &context));
        assert!(!SelectorMatcher::part_matches(&SelectorPart::class_only("secondary"), &context));

        let part = SelectorPart::new().with_class("primary").with_class("large");
        assert!(SelectorMatcher::part_matches(&part, &context));

        let part = SelectorPart::new().with_class("primary").with_class("small");
        assert!(!SelectorMatcher::part_matches(&part, &context));
    }

    #[test]
    fn id_selector_matches() {
        let classes = vec![];
        let mut context = make_context("input", &classes);
        context.id = Some("search");

        assert!(SelectorMatcher::part_matches(&SelectorPart::id_only("search"), &context));
        assert!(!SelectorMatcher::part_matches(&SelectorPart::id_only("query"), &context));
    }

    #[test]
    fn attribute_selector_matches() {
        let classes = vec!["search".to_string(), "wide".to_string()];
        let attributes = vec![("name".to_string(), "q".to_string()), ("type".to_string(), "search".to_string())];
        let mut context = make_context("input", &classes);
        context.attributes = attributes.as_slice();
        context.id = Some("people");

        let part = |name: &str, value: &str| {
            SelectorPart::new().with_attribute(AttributeSelector::with_value(name, AttributeOperator::Equals, value))
        };
        assert!(SelectorMatcher::part_matches(&part("name", "q"), &context));
        assert!(!SelectorMatcher::part_matches(&part("name", "query"), &context));
        assert!(SelectorMatcher::part_matches(&part("id", "people"), &context));
        assert!(SelectorMatcher::part_matches(&part("class", "search wide"), &context));
        assert!(SelectorMatcher::part_matches(
            &SelectorPart::new().with_attribute(AttributeSelector::present("TYPE")),
            &context
        ));
        assert!(!SelectorMatcher::part_matches(
            &SelectorPart::new().with_attribute(AttributeSelector::present("disabled")),
            &context
        ));
        assert!(!SelectorMatcher::part_matches(
            &SelectorPart::new().with_attribute(AttributeSelector::present("class")),
            &make_context("input", &[])
        ));
    }

    #[test]
    fn structural_pseudo_class_matches() {
        let classes = vec![];
        let mut context = make_context("div", &classes);
        context.sibling_info = Some(SiblingInfo { index: 0, count: 3 });

        let first = SelectorPart::new().with_pseudo(PseudoClass::FirstChild);
        let last = SelectorPart::new().with_pseudo(PseudoClass::LastChild);
        let second = SelectorPart::new().with_pseudo(PseudoClass::NthChild(NthExpr::new(0, 2)));
        assert!(SelectorMatcher::part_matches(&first, &context));
        assert!(!SelectorMatcher::part_matches(&last, &context));

        context.sibling_info = Some(SiblingInfo { index: 2, count: 3 });
        assert!(SelectorMatcher::part_matches(&last, &context));

        context.sibling_info = Some(SiblingInfo { index: 1, count: 3 });
        assert!(SelectorMatcher::part_matches(&second, &context));

        // Detached elements have no siblings.
        context.sibling_info = None;
        assert!(!SelectorMatcher::part_matches(&first, &context));
    }

    #[test]
    fn not_pseudo_class_matches() {
        let classes = vec![];
        let context = make_context("div", &classes);
        let part = SelectorPart::new().with_pseudo(PseudoClass::Not(Box::new(
            SelectorPart::class_only("primary"),
        )));
        assert!(SelectorMatcher::part_matches(&part, &context));

        let classes = vec!["primary".to_string()];
        let context = make_context("div", &classes);
        assert!(!SelectorMatcher::part_matches(&part, &context));
    }

    fn tree() -> (Document, ElementId, ElementId, ElementId) {
        // <body><div.list><div.item/><div.item.last/></div.list></body>
        let doc = Document::new();
        let list = doc.create_element("div");
        doc.add_class(list, "list").unwrap();
        doc.append_child(doc.body(), list).unwrap();
        let first = doc.create_element("div");
        doc.add_class(first, "item").unwrap();
        doc.append_child(list, first).unwrap();
        let second = doc.create_element("div");
        doc.add_class(second, "item").unwrap();
        doc.add_class(second, "last").unwrap();
        doc.append_child(list, second).unwrap();
        (doc, list, first, second)
    }

    #[test]
    fn descendant_backtracks_over_ancestors() {
        let (doc, _, first, _) = tree();
        // `div .item`: the nearest div ancestor is .list, which matches.
        let sel = Selector::type_selector("div").descendant(SelectorPart::class_only("item"));
        assert!(matches_full(&sel, &doc, first));

        // `body > .list .item` needs to skip past the .list hop.
        let sel = Selector::type_selector("body")
            .child(SelectorPart::class_only("list"))
            .descendant(SelectorPart::class_only("item"));
        assert!(matches_full(&sel, &doc, first));

        let sel = Selector::type_selector("form").descendant(SelectorPart::class_only("item"));
        assert!(!matches_full(&sel, &doc, first));
    }

    #[test]
    fn child_requires_direct_parent() {
        let (doc, _, first, _) = tree();
        let sel = Selector::type_selector("body").child(SelectorPart::class_only("item"));
        assert!(!matches_full(&sel, &doc, first));
        let sel = Selector::class("list").child(SelectorPart::class_only("item"));
        assert!(matches_full(&sel, &doc, first));
    }

    #[test]
    fn sibling_combinators() {
        let (doc, _, first, second) = tree();
        let adjacent = Selector::class("item").combine(Combinator::AdjacentSibling, SelectorPart::class_only("last"));
        assert!(matches_full(&adjacent, &doc, second));
        assert!(!matches_full(&adjacent, &doc, first));

        let general = Selector::class("item").combine(Combinator::GeneralSibling, SelectorPart::class_only("item"));
        assert!(matches_full(&general, &doc, second));
        assert!(!matches_full(&general, &doc, first));
    }

    #[test]
    fn destroyed_elements_never_match() {
        let (doc, list, first, _) = tree();
        doc.destroy_element(list).unwrap();
        assert!(!matches_full(&Selector::universal(), &doc, first));
    }
}
