//! Core systems for input-dropdown.
//!
//! This crate provides the host-side foundation the dropdown widget is built on:
//!
//! - **Document**: A headless element tree with classes, inline styles, leaf
//!   content and embedder-reported layout boxes
//! - **Events**: Listeners on elements, the document and the window, with
//!   bubbling dispatch
//! - **Mutation Observation**: Observers with checkpoint delivery, plus the
//!   legacy insertion/removal events for hosts without observers
//! - **Signal/Slot System**: Type-safe notifications
//! - **Logging**: Tracing targets, element tree dumps and performance spans
//!
//! # Document Example
//!
//! ```
//! use input_dropdown_core::{Document, EventKind, EventTarget};
//!
//! let doc = Document::new();
//! let button = doc.create_element("button");
//! doc.append_child(doc.body(), button).unwrap();
//!
//! // Clicks bubble up to document-level listeners.
//! doc.add_event_listener(EventTarget::Document, EventKind::Click, |event| {
//!     println!("clicked {:?}", event.target);
//! });
//! doc.click(button).unwrap();
//! ```
//!
//! # Signal/Slot Example
//!
//! ```
//! use input_dropdown_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod document;
mod element;
mod error;
mod event;
mod geometry;
pub mod logging;
mod mutation;
pub mod signal;

pub use document::{Document, ElementInfo, MAX_DELIVERY_ROUNDS};
pub use element::{Content, ElementId, escape_html};
pub use error::{DomError, DomResult};
pub use event::{Event, EventHandler, EventKind, EventTarget, Key, ListenerId};
pub use geometry::Rect;
pub use logging::{DocumentTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use mutation::{
    MutationCallback, MutationObserverInit, MutationRecord, MutationSupport, ObserverId,
};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
