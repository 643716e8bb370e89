//! Cascade ordering.

use crate::rules::StylePriority;
use crate::selector::Specificity;

/// Where a candidate declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CascadeOrigin {
    /// A rule from a stylesheet.
    Sheet(StylePriority),
    /// The element's own `style` declarations.
    Inline,
}

/// Sort key for competing declarations of one property.
///
/// The greatest key wins. Fields are compared in declaration order:
/// `!important` first, then origin, then specificity, then source position.
/// Inline declarations beat normal sheet declarations; an `!important`
/// sheet declaration beats inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CascadeKey {
    /// Whether the declaration is `!important`.
    pub important: bool,
    /// Origin of the declaration.
    pub origin: CascadeOrigin,
    /// Selector specificity (zero for inline).
    pub specificity: Specificity,
    /// Index of the stylesheet within its priority band.
    pub sheet_index: usize,
    /// Rule order within the sheet.
    pub rule_order: u32,
    /// Declaration index within the rule.
    pub declaration_index: usize,
}

impl CascadeKey {
    /// Key for an inline declaration.
    pub fn inline() -> Self {
        Self {
            important: false,
            origin: CascadeOrigin::Inline,
            specificity: Specificity::ZERO,
            sheet_index: 0,
            rule_order: 0,
            declaration_index: 0,
        }
    }
}
