//! Keyboard navigation over the rendered items.
//!
//! The widget depends only on the [`Navigator`] trait. It builds a navigator
//! through a [`NavigatorFactory`] once the dropdown is first inserted into the
//! document; [`Keywalk`] is the default implementation.

use std::sync::{Arc, Weak};

use input_dropdown_core::{Document, ElementId, Event, EventKind, EventTarget, Key, ListenerId};
use input_dropdown_style::resolve::StyleEngine;
use parking_lot::Mutex;

use crate::constants::ITEM_ACTIVE_CLASS;

const TARGET: &str = "input_dropdown::keywalk";

/// Callback receiving `(item element, item index)`.
pub type NavigationCallback = Arc<dyn Fn(ElementId, usize) + Send + Sync>;

/// Builds a navigator for a freshly inserted dropdown.
pub type NavigatorFactory = Arc<dyn Fn(NavigatorParams) -> Box<dyn Navigator> + Send + Sync>;

/// A keyboard navigation capability bound to one dropdown.
pub trait Navigator: Send + Sync {
    /// Forget the cursor position.
    fn reset(&self);

    /// Release everything the navigator registered. Called when the widget
    /// is destroyed.
    fn dispose(&self) {}
}

/// Everything a navigator is constructed with.
#[derive(Clone)]
pub struct NavigatorParams {
    /// The document both elements live in.
    pub document: Document,
    /// The element receiving key presses (the input).
    pub trigger: ElementId,
    /// The element whose children are navigated (the dropdown).
    pub container: ElementId,
    /// Reports cursor movement.
    pub on_walk: NavigationCallback,
    /// Reports confirmation of the item under the cursor.
    pub on_select: NavigationCallback,
    /// Resolves whether the container is currently displayed.
    pub styles: Arc<StyleEngine>,
}

impl std::fmt::Debug for NavigatorParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigatorParams")
            .field("trigger", &self.trigger)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Keywalk
// ============================================================================

/// Arrow-key traversal with Enter to select.
///
/// - ArrowDown/ArrowUp move the cursor with wrap-around. From no cursor,
///   ArrowDown lands on the first item and ArrowUp on the last.
/// - Enter reports the item under the cursor.
/// - Keys are ignored while the container is not displayed or has no items.
///
/// The item under the cursor carries [`ITEM_ACTIVE_CLASS`].
pub struct Keywalk {
    shared: Arc<KeywalkShared>,
    listener: Mutex<Option<ListenerId>>,
}

struct KeywalkShared {
    params: NavigatorParams,
    /// Index of the item under the cursor.
    cursor: Mutex<Option<usize>>,
}

impl Keywalk {
    /// Attach to the trigger's keydown events.
    pub fn attach(params: NavigatorParams) -> Self {
        let document = params.document.clone();
        let trigger = params.trigger;
        let shared = Arc::new(KeywalkShared {
            params,
            cursor: Mutex::new(None),
        });

        let weak: Weak<KeywalkShared> = Arc::downgrade(&shared);
        let listener = document.add_event_listener(
            EventTarget::Element(trigger),
            EventKind::KeyDown,
            move |event: &Event| {
                if let (Some(shared), Some(key)) = (weak.upgrade(), event.key) {
                    shared.handle_key(key);
                }
            },
        );
        tracing::debug!(target: TARGET, ?trigger, "keywalk attached");

        Self {
            shared,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// The default factory, attaching a [`Keywalk`].
    pub fn factory() -> NavigatorFactory {
        Arc::new(|params: NavigatorParams| -> Box<dyn Navigator> { Box::new(Keywalk::attach(params)) })
    }

    /// Index of the item under the cursor.
    pub fn cursor(&self) -> Option<usize> {
        *self.shared.cursor.lock()
    }
}

impl Navigator for Keywalk {
    fn reset(&self) {
        self.shared.reset();
    }

    fn dispose(&self) {
        self.shared.reset();
        if let Some(listener) = self.listener.lock().take() {
            self.shared.params.document.remove_event_listener(listener);
            tracing::debug!(target: TARGET, "keywalk disposed");
        }
    }
}

impl Drop for Keywalk {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl KeywalkShared {
    fn items(&self) -> Vec<ElementId> {
        let NavigatorParams {
            document,
            container,
            styles,
            ..
        } = &self.params;
        if !styles.is_displayed(document, *container) {
            return Vec::new();
        }
        document.children(*container).unwrap_or_default()
    }

    fn handle_key(&self, key: Key) {
        if !matches!(key, Key::ArrowDown | Key::ArrowUp | Key::Enter) {
            return;
        }
        let items = self.items();
        if items.is_empty() {
            tracing::trace!(target: TARGET, ?key, "ignoring key: nothing to navigate");
            return;
        }

        let last = items.len() - 1;
        // A cursor past the end belongs to an earlier render.
        let current = (*self.cursor.lock()).filter(|&index| index <= last);
        match key {
            Key::ArrowDown => {
                let next = match current {
                    Some(index) if index < last => index + 1,
                    _ => 0,
                };
                self.walk_to(&items, current, next);
            }
            Key::ArrowUp => {
                let next = match current {
                    Some(index) if index > 0 => index - 1,
                    _ => last,
                };
                self.walk_to(&items, current, next);
            }
            Key::Enter => {
                if let Some(index) = current {
                    tracing::debug!(target: TARGET, index, "select");
                    (self.params.on_select)(items[index], index);
                }
            }
            _ => {}
        }
    }

    fn walk_to(&self, items: &[ElementId], from: Option<usize>, to: usize) {
        if let Some(from) = from {
            self.mark(items[from], false);
        }
        self.mark(items[to], true);
        *self.cursor.lock() = Some(to);

        tracing::trace!(target: TARGET, ?from, to, "walk");
        (self.params.on_walk)(items[to], to);
    }

    fn reset(&self) {
        let Some(index) = self.cursor.lock().take() else {
            return;
        };
        let document = &self.params.document;
        if let Some(&item) = document
            .children(self.params.container)
            .unwrap_or_default()
            .get(index)
        {
            self.mark(item, false);
        }
    }

    /// Add or remove the active class. The item may already be gone after a
    /// re-render.
    fn mark(&self, item: ElementId, active: bool) {
        let document = &self.params.document;
        let result = if active {
            document.add_class(item, ITEM_ACTIVE_CLASS)
        } else {
            document.remove_class(item, ITEM_ACTIVE_CLASS)
        };
        if let Err(error) = result {
            tracing::warn!(target: TARGET, ?item, active, %error, "failed to update active class");
        }
    }
}
