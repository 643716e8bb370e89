//! Error types for the host document.

use std::fmt;

/// Errors returned by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The element ID is invalid or the element has been destroyed.
    InvalidElementId,
    /// Attempted to insert an element into itself or one of its descendants.
    CircularParentage,
    /// The element is not a child of the given parent.
    NotAChild,
    /// The document root cannot be detached or destroyed.
    RootElement,
    /// The host has no mutation observation capability.
    MutationObserverUnsupported,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidElementId => write!(f, "Invalid or destroyed element ID"),
            Self::CircularParentage => {
                write!(f, "Cannot insert an element into itself or its descendant")
            }
            Self::NotAChild => write!(f, "Element is not a child of the given parent"),
            Self::RootElement => write!(f, "The document root element cannot be removed"),
            Self::MutationObserverUnsupported => {
                write!(f, "Mutation observation is not supported by this document")
            }
        }
    }
}

impl std::error::Error for DomError {}

/// Result type for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;
