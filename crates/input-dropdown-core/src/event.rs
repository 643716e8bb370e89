//! Event types delivered to document listeners.
//!
//! Events are dispatched with [`Document::dispatch_event`](crate::Document::dispatch_event).
//! Events aimed at an element bubble from the element through its ancestors
//! to the document and finally the window, so a single document-level
//! listener observes every click on the page.

use std::fmt;
use std::sync::Arc;

use slotmap::new_key_type;

use crate::element::ElementId;

new_key_type! {
    /// Identifier of a registered event listener.
    ///
    /// Returned by [`Document::add_event_listener`](crate::Document::add_event_listener)
    /// and accepted by [`Document::remove_event_listener`](crate::Document::remove_event_listener).
    pub struct ListenerId;
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The window (load, resize).
    Window,
    /// The document itself.
    Document,
    /// A single element.
    Element(ElementId),
}

/// The kind of an event. Listeners are registered per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The value of a form control changed through user input.
    Input,
    /// A pointer click.
    Click,
    /// A key was pressed while the target had focus.
    KeyDown,
    /// The window finished loading.
    Load,
    /// The window was resized.
    Resize,
    /// Legacy mutation event: a node was inserted.
    NodeInserted,
    /// Legacy mutation event: a node was removed.
    NodeRemoved,
}

impl EventKind {
    /// The DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::Load => "load",
            Self::Resize => "resize",
            Self::NodeInserted => "DOMNodeInserted",
            Self::NodeRemoved => "DOMNodeRemoved",
        }
    }

    /// Whether events of this kind propagate to ancestors.
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::Load | Self::Resize)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys the document reports through [`EventKind::KeyDown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    /// A printable character.
    Character(char),
}

/// A dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// The element the event was aimed at, if any.
    pub target: Option<ElementId>,
    /// The pressed key for [`EventKind::KeyDown`].
    pub key: Option<Key>,
}

impl Event {
    /// Create an event of the given kind with no target.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            key: None,
        }
    }

    /// Create an event aimed at an element.
    pub fn targeted(kind: EventKind, target: ElementId) -> Self {
        Self {
            kind,
            target: Some(target),
            key: None,
        }
    }

    /// Create a keydown event aimed at an element.
    pub fn key_down(target: ElementId, key: Key) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target: Some(target),
            key: Some(key),
        }
    }
}

/// A listener callback.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;
