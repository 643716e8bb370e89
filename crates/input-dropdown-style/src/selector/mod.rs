//! CSS selector types and matching.

mod matcher;
mod specificity;
mod types;

pub use matcher::{
    ElementMatchContext, ElementTree, SelectorMatcher, SiblingInfo, matches_full, matches_list,
};
pub use specificity::{Specificity, SpecificityWithOrder};
pub use types::*;
