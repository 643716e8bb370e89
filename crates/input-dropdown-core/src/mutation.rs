//! Mutation observation.
//!
//! A [`Document`](crate::Document) records attribute and child-list changes
//! for every registered observer whose root covers the changed node. Records
//! are queued and handed to the observer callbacks at the next
//! [`flush_mutations`](crate::Document::flush_mutations) checkpoint, which
//! every dispatched event ends with.
//!
//! Hosts without the capability are modelled with [`MutationSupport`]:
//! `LegacyEvents` hosts only queue `DOMNodeInserted` / `DOMNodeRemoved`
//! events, `Unsupported` hosts report nothing at all.

use std::sync::Arc;

use slotmap::new_key_type;

use crate::element::ElementId;

new_key_type! {
    /// Identifier of a registered mutation observer.
    pub struct ObserverId;
}

/// The mutation tracking capability of a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationSupport {
    /// Mutation observers are available.
    #[default]
    Observer,
    /// Only the legacy node insertion/removal events are available.
    LegacyEvents,
    /// No mutation tracking at all.
    Unsupported,
}

/// What an observer wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationObserverInit {
    /// Report attribute changes (class, style, id and plain attributes).
    pub attributes: bool,
    /// Report child insertions and removals.
    pub child_list: bool,
    /// Extend observation to the whole subtree of the root.
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Observe everything under the root.
    pub fn everything() -> Self {
        Self {
            attributes: true,
            child_list: true,
            subtree: true,
        }
    }
}

/// A single recorded change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// An attribute of `target` changed.
    Attributes {
        /// The element whose attribute changed.
        target: ElementId,
        /// The attribute name (`"class"`, `"style"`, ...).
        name: String,
    },
    /// Children of `target` were added or removed.
    ChildList {
        /// The parent whose child list changed.
        target: ElementId,
        /// Inserted children.
        added: Vec<ElementId>,
        /// Removed children.
        removed: Vec<ElementId>,
    },
}

impl MutationRecord {
    /// The node the record is about.
    pub fn target(&self) -> ElementId {
        match self {
            Self::Attributes { target, .. } | Self::ChildList { target, .. } => *target,
        }
    }

    /// Whether this is an attribute record.
    pub fn is_attributes(&self) -> bool {
        matches!(self, Self::Attributes { .. })
    }
}

/// An observer callback. Receives every record queued since the last delivery.
pub type MutationCallback = Arc<dyn Fn(&[MutationRecord]) + Send + Sync>;

pub(crate) struct Observer {
    pub(crate) root: ElementId,
    pub(crate) init: MutationObserverInit,
    pub(crate) callback: MutationCallback,
    pub(crate) pending: Vec<MutationRecord>,
}

impl Observer {
    /// Whether a change to `target` (given its ancestors) is visible to this observer.
    pub(crate) fn covers(&self, target: ElementId, ancestors: &[ElementId]) -> bool {
        target == self.root || (self.init.subtree && ancestors.contains(&self.root))
    }

    pub(crate) fn wants(&self, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::Attributes { .. } => self.init.attributes,
            MutationRecord::ChildList { .. } => self.init.child_list,
        }
    }
}
