//! The host document.
//!
//! [`Document`] is a headless rendition of the parts of a browser document a
//! floating widget touches: an element tree with classes, inline styles and
//! leaf content, layout rectangles reported by the embedder, event listeners
//! with bubbling, and mutation observation.
//!
//! # Re-entrancy
//!
//! `Document` is a cheap handle around shared state. Listener and observer
//! callbacks are only ever invoked from [`Document::dispatch_event`] and
//! [`Document::flush_mutations`], and always after the internal lock has been
//! released, so callbacks may call back into the same document freely. All
//! other methods are plain reads and writes.
//!
//! # Example
//!
//! ```
//! use input_dropdown_core::{Document, EventKind, EventTarget, Rect};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let doc = Document::new();
//! let input = doc.create_element("input");
//! doc.append_child(doc.body(), input).unwrap();
//! doc.set_layout_rect(input, Rect::new(10.0, 20.0, 200.0, 30.0)).unwrap();
//!
//! let inputs = Arc::new(AtomicUsize::new(0));
//! let counter = inputs.clone();
//! doc.add_event_listener(EventTarget::Document, EventKind::Input, move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! doc.type_text(input, "al").unwrap();
//! assert_eq!(inputs.load(Ordering::SeqCst), 1);
//! assert_eq!(doc.value(input).unwrap(), "al");
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::element::{Content, ElementData, ElementId, escape_html};
use crate::error::{DomError, DomResult};
use crate::event::{Event, EventHandler, EventKind, EventTarget, Key, ListenerId};
use crate::geometry::Rect;
use crate::logging::targets;
use crate::mutation::{
    MutationCallback, MutationObserverInit, MutationRecord, MutationSupport, Observer, ObserverId,
};

/// Upper bound on delivery rounds in one [`Document::flush_mutations`] call.
///
/// Observers that keep mutating the nodes they observe would otherwise loop
/// forever.
pub const MAX_DELIVERY_ROUNDS: usize = 32;

/// A snapshot of the selector-relevant facts about one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// Lower-case tag name.
    pub tag: String,
    /// The `id` attribute.
    pub id: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Plain attributes as `(name, value)` pairs, in the order they were set.
    pub attributes: Vec<(String, String)>,
    /// Parent element.
    pub parent: Option<ElementId>,
    /// Number of child elements.
    pub child_count: usize,
    /// Position among the parent's children (0 for detached elements).
    pub sibling_index: usize,
    /// Number of children of the parent including this one (1 for detached elements).
    pub sibling_count: usize,
}

struct Listener {
    target: EventTarget,
    kind: EventKind,
    handler: EventHandler,
    /// Registration order; slotmap iteration order is not insertion order.
    order: u64,
}

struct PendingLegacyEvent {
    kind: EventKind,
    target: ElementId,
    /// The bubbling path captured when the change happened.
    path: Vec<ElementId>,
}

struct DocumentInner {
    elements: SlotMap<ElementId, ElementData>,
    root: ElementId,
    body: ElementId,
    listeners: SlotMap<ListenerId, Listener>,
    next_listener_order: u64,
    observers: SlotMap<ObserverId, Observer>,
    pending_legacy: Vec<PendingLegacyEvent>,
    support: MutationSupport,
}

impl DocumentInner {
    fn new(support: MutationSupport) -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(ElementData::new("html"));
        let body = elements.insert(ElementData::new("body"));
        if let Some(data) = elements.get_mut(body) {
            data.parent = Some(root);
        }
        if let Some(data) = elements.get_mut(root) {
            data.children.push(body);
        }
        Self {
            elements,
            root,
            body,
            listeners: SlotMap::with_key(),
            next_listener_order: 0,
            observers: SlotMap::with_key(),
            pending_legacy: Vec::new(),
            support,
        }
    }

    fn get(&self, id: ElementId) -> DomResult<&ElementData> {
        self.elements.get(id).ok_or(DomError::InvalidElementId)
    }

    fn get_mut(&mut self, id: ElementId) -> DomResult<&mut ElementData> {
        self.elements.get_mut(id).ok_or(DomError::InvalidElementId)
    }

    fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = self.elements.get(id).and_then(|d| d.parent);
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.elements.get(current_id).and_then(|d| d.parent);
        }
        result
    }

    fn is_connected(&self, id: ElementId) -> bool {
        id == self.root || self.ancestors(id).last() == Some(&self.root)
    }

    fn preorder(&self, id: ElementId, result: &mut Vec<ElementId>) {
        if let Some(data) = self.elements.get(id) {
            result.push(id);
            for &child in &data.children {
                self.preorder(child, result);
            }
        }
    }

    fn record(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let target = record.target();
        let ancestors = self.ancestors(target);
        for (_, observer) in self.observers.iter_mut() {
            if observer.covers(target, &ancestors) && observer.wants(&record) {
                observer.pending.push(record.clone());
            }
        }
    }

    fn queue_legacy(&mut self, kind: EventKind, target: ElementId, parent: ElementId) {
        if self.support != MutationSupport::LegacyEvents || !self.is_connected(parent) {
            return;
        }
        let mut path = vec![target, parent];
        path.extend(self.ancestors(parent));
        self.pending_legacy.push(PendingLegacyEvent { kind, target, path });
    }

    fn attribute_changed(&mut self, target: ElementId, name: &str) {
        self.record(MutationRecord::Attributes {
            target,
            name: name.to_string(),
        });
    }

    fn detach(&mut self, id: ElementId) -> DomResult<Option<ElementId>> {
        if id == self.root {
            return Err(DomError::RootElement);
        }
        let parent = self.get(id)?.parent;
        if let Some(parent_id) = parent {
            self.queue_legacy(EventKind::NodeRemoved, id, parent_id);
            if let Some(parent_data) = self.elements.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
            if let Some(data) = self.elements.get_mut(id) {
                data.parent = None;
            }
            self.record(MutationRecord::ChildList {
                target: parent_id,
                added: Vec::new(),
                removed: vec![id],
            });
        }
        Ok(parent)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.get(parent)?;
        self.get(child)?;
        if child == self.root {
            return Err(DomError::RootElement);
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            return Err(DomError::CircularParentage);
        }
        self.detach(child)?;
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        self.record(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        self.queue_legacy(EventKind::NodeInserted, child, parent);
        Ok(())
    }

    /// Remove a subtree from the arena, dropping listeners and observers bound to it.
    fn purge_subtree(&mut self, id: ElementId) {
        let mut doomed = Vec::new();
        self.preorder(id, &mut doomed);
        for element in &doomed {
            self.elements.remove(*element);
        }
        self.listeners.retain(|_, listener| match listener.target {
            EventTarget::Element(el) => !doomed.contains(&el),
            _ => true,
        });
        self.observers
            .retain(|_, observer| !doomed.contains(&observer.root));
        tracing::trace!(target: targets::DOCUMENT, count = doomed.len(), "purged element subtree");
    }

    fn destroy(&mut self, id: ElementId) -> DomResult<()> {
        if id == self.root || id == self.body {
            return Err(DomError::RootElement);
        }
        self.detach(id)?;
        self.purge_subtree(id);
        Ok(())
    }

    fn clear_children(&mut self, id: ElementId) -> DomResult<bool> {
        let data = self.get_mut(id)?;
        let children = std::mem::take(&mut data.children);
        let had_content = data.content.take().is_some();
        if children.is_empty() && !had_content {
            return Ok(false);
        }
        for &child in &children {
            self.queue_legacy(EventKind::NodeRemoved, child, id);
            self.purge_subtree(child);
        }
        self.record(MutationRecord::ChildList {
            target: id,
            added: Vec::new(),
            removed: children,
        });
        Ok(true)
    }

    fn set_content(&mut self, id: ElementId, content: Content) -> DomResult<()> {
        self.clear_children(id)?;
        self.get_mut(id)?.content = Some(content);
        self.record(MutationRecord::ChildList {
            target: id,
            added: Vec::new(),
            removed: Vec::new(),
        });
        Ok(())
    }

    fn text_content(&self, id: ElementId, out: &mut String) -> DomResult<()> {
        let data = self.get(id)?;
        if let Some(content) = &data.content {
            out.push_str(&content.to_text());
        }
        for &child in &data.children {
            self.text_content(child, out)?;
        }
        Ok(())
    }

    fn inner_html(&self, id: ElementId, out: &mut String) -> DomResult<()> {
        let data = self.get(id)?;
        if let Some(content) = &data.content {
            out.push_str(&content.to_markup());
        }
        for &child in &data.children {
            self.outer_html(child, out)?;
        }
        Ok(())
    }

    fn outer_html(&self, id: ElementId, out: &mut String) -> DomResult<()> {
        let data = self.get(id)?;
        out.push('<');
        out.push_str(&data.tag);
        if let Some(element_id) = &data.id {
            out.push_str(&format!(" id=\"{}\"", escape_html(element_id)));
        }
        if !data.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&data.classes.join(" "))));
        }
        if !data.style.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape_html(&data.style_text())));
        }
        for (name, value) in &data.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
        }
        out.push('>');
        self.inner_html(id, out)?;
        out.push_str(&format!("</{}>", data.tag));
        Ok(())
    }

    fn collect_handlers(&self, path: &[EventTarget], kind: EventKind) -> Vec<EventHandler> {
        let mut handlers = Vec::new();
        for target in path {
            let mut matching: Vec<&Listener> = self
                .listeners
                .values()
                .filter(|l| l.kind == kind && l.target == *target)
                .collect();
            matching.sort_by_key(|l| l.order);
            handlers.extend(matching.into_iter().map(|l| l.handler.clone()));
        }
        handlers
    }

    fn propagation_path(&self, target: EventTarget, kind: EventKind) -> Vec<EventTarget> {
        if !kind.bubbles() {
            return vec![target];
        }
        match target {
            EventTarget::Element(el) => {
                let mut path = vec![EventTarget::Element(el)];
                path.extend(self.ancestors(el).into_iter().map(EventTarget::Element));
                if self.is_connected(el) {
                    path.push(EventTarget::Document);
                    path.push(EventTarget::Window);
                }
                path
            }
            EventTarget::Document => vec![EventTarget::Document, EventTarget::Window],
            EventTarget::Window => vec![EventTarget::Window],
        }
    }
}

/// A shared handle to a headless host document.
///
/// Cloning the handle is cheap; all clones see the same tree.
#[derive(Clone)]
pub struct Document {
    inner: Arc<Mutex<DocumentInner>>,
}

static_assertions::assert_impl_all!(Document: Send, Sync);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Document")
            .field("elements", &inner.elements.len())
            .field("listeners", &inner.listeners.len())
            .field("observers", &inner.observers.len())
            .field("mutation_support", &inner.support)
            .finish()
    }
}

impl Document {
    /// Create an empty document (`<html><body></body></html>`) with mutation
    /// observer support.
    pub fn new() -> Self {
        Self::with_mutation_support(MutationSupport::Observer)
    }

    /// Create an empty document with the given mutation tracking capability.
    pub fn with_mutation_support(support: MutationSupport) -> Self {
        tracing::debug!(target: targets::DOCUMENT, ?support, "created document");
        Self {
            inner: Arc::new(Mutex::new(DocumentInner::new(support))),
        }
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The mutation tracking capability of this document.
    pub fn mutation_support(&self) -> MutationSupport {
        self.inner.lock().support
    }

    /// The root `<html>` element.
    pub fn document_element(&self) -> ElementId {
        self.inner.lock().root
    }

    /// The `<body>` element.
    pub fn body(&self) -> ElementId {
        self.inner.lock().body
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> ElementId {
        let id = self.inner.lock().elements.insert(ElementData::new(tag));
        tracing::trace!(target: targets::DOCUMENT, ?id, tag, "created element");
        id
    }

    /// Whether the element exists (has not been destroyed).
    pub fn exists(&self, id: ElementId) -> bool {
        self.inner.lock().elements.contains_key(id)
    }

    /// Number of live elements, attached or not.
    pub fn element_count(&self) -> usize {
        self.inner.lock().elements.len()
    }

    /// Append `child` to `parent`, moving it out of its current parent first.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.inner.lock().append_child(parent, child)
    }

    /// Remove `child` from `parent`. The child stays alive, detached.
    pub fn remove_child(&self, parent: ElementId, child: ElementId) -> DomResult<()> {
        let mut inner = self.inner.lock();
        if inner.get(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild);
        }
        inner.detach(child).map(|_| ())
    }

    /// Detach an element from its parent, if any. Returns the former parent.
    pub fn detach(&self, id: ElementId) -> DomResult<Option<ElementId>> {
        self.inner.lock().detach(id)
    }

    /// Detach and destroy an element and its whole subtree.
    ///
    /// Listeners attached to destroyed elements and observers rooted in the
    /// subtree are dropped with it.
    pub fn destroy_element(&self, id: ElementId) -> DomResult<()> {
        self.inner.lock().destroy(id)
    }

    /// Destroy all children and clear the leaf content (`innerHTML = ''`).
    ///
    /// Returns `false` when there was nothing to clear.
    pub fn clear_children(&self, id: ElementId) -> DomResult<bool> {
        self.inner.lock().clear_children(id)
    }

    /// The parent element.
    pub fn parent(&self, id: ElementId) -> DomResult<Option<ElementId>> {
        self.inner.lock().get(id).map(|d| d.parent)
    }

    /// The child elements in document order.
    pub fn children(&self, id: ElementId) -> DomResult<Vec<ElementId>> {
        self.inner.lock().get(id).map(|d| d.children.clone())
    }

    /// Ancestors from the immediate parent to the root.
    pub fn ancestors(&self, id: ElementId) -> DomResult<Vec<ElementId>> {
        let inner = self.inner.lock();
        inner.get(id)?;
        Ok(inner.ancestors(id))
    }

    /// Whether `id` is `ancestor` or one of its descendants (`Node.contains`).
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let inner = self.inner.lock();
        ancestor == id && inner.elements.contains_key(id) || inner.ancestors(id).contains(&ancestor)
    }

    /// Whether the element is attached under the document root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let inner = self.inner.lock();
        inner.elements.contains_key(id) && inner.is_connected(id)
    }

    /// Pre-order traversal starting at (and including) `id`.
    pub fn depth_first_preorder(&self, id: ElementId) -> DomResult<Vec<ElementId>> {
        let inner = self.inner.lock();
        inner.get(id)?;
        let mut result = Vec::new();
        inner.preorder(id, &mut result);
        Ok(result)
    }

    /// Lower-case tag name.
    pub fn tag_name(&self, id: ElementId) -> DomResult<String> {
        self.inner.lock().get(id).map(|d| d.tag.clone())
    }

    /// Selector-relevant facts about an element, read under a single lock.
    pub fn element_info(&self, id: ElementId) -> DomResult<ElementInfo> {
        let inner = self.inner.lock();
        let data = inner.get(id)?;
        let (sibling_index, sibling_count) = match data.parent.and_then(|p| inner.elements.get(p)) {
            Some(parent) => (
                parent.children.iter().position(|&c| c == id).unwrap_or(0),
                parent.children.len(),
            ),
            None => (0, 1),
        };
        Ok(ElementInfo {
            tag: data.tag.clone(),
            id: data.id.clone(),
            classes: data.classes.clone(),
            attributes: data.attributes.clone(),
            parent: data.parent,
            child_count: data.children.len(),
            sibling_index,
            sibling_count,
        })
    }

    // =========================================================================
    // Attributes, classes and inline style
    // =========================================================================

    /// The `id` attribute.
    pub fn element_id(&self, id: ElementId) -> DomResult<Option<String>> {
        self.inner.lock().get(id).map(|d| d.id.clone())
    }

    /// Set the `id` attribute.
    pub fn set_element_id(&self, id: ElementId, value: impl Into<String>) -> DomResult<()> {
        let value = value.into();
        let mut inner = self.inner.lock();
        let data = inner.get_mut(id)?;
        if data.id.as_deref() == Some(value.as_str()) {
            return Ok(());
        }
        data.id = Some(value);
        inner.attribute_changed(id, "id");
        Ok(())
    }

    /// Add a class. Returns `false` if it was already present.
    pub fn add_class(&self, id: ElementId, class: &str) -> DomResult<bool> {
        let mut inner = self.inner.lock();
        let data = inner.get_mut(id)?;
        if data.classes.iter().any(|c| c == class) {
            return Ok(false);
        }
        data.classes.push(class.to_string());
        inner.attribute_changed(id, "class");
        Ok(true)
    }

    /// Remove a class. Returns `false` if it was not present.
    pub fn remove_class(&self, id: ElementId, class: &str) -> DomResult<bool> {
        let mut inner = self.inner.lock();
        let data = inner.get_mut(id)?;
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        if data.classes.len() == before {
            return Ok(false);
        }
        inner.attribute_changed(id, "class");
        Ok(true)
    }

    /// Whether the element carries the class.
    pub fn has_class(&self, id: ElementId, class: &str) -> DomResult<bool> {
        self.inner
            .lock()
            .get(id)
            .map(|d| d.classes.iter().any(|c| c == class))
    }

    /// The class list.
    pub fn classes(&self, id: ElementId) -> DomResult<Vec<String>> {
        self.inner.lock().get(id).map(|d| d.classes.clone())
    }

    /// Set an inline style property. Returns `false` (and records nothing)
    /// when the property already has this value.
    pub fn set_style(&self, id: ElementId, property: &str, value: &str) -> DomResult<bool> {
        let mut inner = self.inner.lock();
        let data = inner.get_mut(id)?;
        match data.style.iter_mut().find(|(name, _)| name == property) {
            Some((_, current)) if current == value => return Ok(false),
            Some((_, current)) => *current = value.to_string(),
            None => data.style.push((property.to_string(), value.to_string())),
        }
        inner.attribute_changed(id, "style");
        Ok(true)
    }

    /// Remove an inline style property. Returns `false` if it was not set.
    pub fn remove_style(&self, id: ElementId, property: &str) -> DomResult<bool> {
        let mut inner = self.inner.lock();
        let data = inner.get_mut(id)?;
        let before = data.style.len();
        data.style.retain(|(name, _)| name != property);
        if data.style.len() == before {
            return Ok(false);
        }
        inner.attribute_changed(id, "style");
        Ok(true)
    }

    /// An inline style property.
    pub fn style(&self, id: ElementId, property: &str) -> DomResult<Option<String>> {
        self.inner
            .lock()
            .get(id)
            .map(|d| d.style_value(property).map(str::to_string))
    }

    /// The serialized inline style (`"width: 200px; left: 10px;"`).
    pub fn style_text(&self, id: ElementId) -> DomResult<String> {
        self.inner.lock().get(id).map(|d| d.style_text())
    }

    /// Set a plain attribute.
    pub fn set_attribute(&self, id: ElementId, name: &str, value: &str) -> DomResult<()> {
        let mut inner = self.inner.lock();
        let data = inner.get_mut(id)?;
        match data.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, current)) if current == value => return Ok(()),
            Some((_, current)) => *current = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
        inner.attribute_changed(id, name);
        Ok(())
    }

    /// A plain attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> DomResult<Option<String>> {
        self.inner.lock().get(id).map(|d| {
            d.attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        })
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace the element's children and content with plain text.
    pub fn set_text_content(&self, id: ElementId, text: impl Into<String>) -> DomResult<()> {
        self.inner.lock().set_content(id, Content::Text(text.into()))
    }

    /// Replace the element's children and content with raw markup.
    ///
    /// The markup is stored verbatim and never sanitized.
    pub fn set_inner_markup(&self, id: ElementId, markup: impl Into<String>) -> DomResult<()> {
        self.inner.lock().set_content(id, Content::Markup(markup.into()))
    }

    /// The element's own leaf content.
    pub fn content(&self, id: ElementId) -> DomResult<Option<Content>> {
        self.inner.lock().get(id).map(|d| d.content.clone())
    }

    /// Concatenated text of the element and its descendants.
    pub fn text_content(&self, id: ElementId) -> DomResult<String> {
        let mut out = String::new();
        self.inner.lock().text_content(id, &mut out)?;
        Ok(out)
    }

    /// Serialized markup of the element's content and children.
    pub fn inner_html(&self, id: ElementId) -> DomResult<String> {
        let mut out = String::new();
        self.inner.lock().inner_html(id, &mut out)?;
        Ok(out)
    }

    /// Serialized markup of the element itself.
    pub fn outer_html(&self, id: ElementId) -> DomResult<String> {
        let mut out = String::new();
        self.inner.lock().outer_html(id, &mut out)?;
        Ok(out)
    }

    // =========================================================================
    // Form values and layout
    // =========================================================================

    /// The current value of a form control.
    pub fn value(&self, id: ElementId) -> DomResult<String> {
        self.inner.lock().get(id).map(|d| d.value.clone())
    }

    /// Set the value of a form control without dispatching an event.
    pub fn set_value(&self, id: ElementId, value: impl Into<String>) -> DomResult<()> {
        self.inner.lock().get_mut(id)?.value = value.into();
        Ok(())
    }

    /// Report the layout box of an element. Layout is not a DOM mutation and
    /// is never reported to observers.
    pub fn set_layout_rect(&self, id: ElementId, rect: Rect) -> DomResult<()> {
        self.inner.lock().get_mut(id)?.layout = rect;
        Ok(())
    }

    /// The element's layout box (`getBoundingClientRect`).
    pub fn bounding_client_rect(&self, id: ElementId) -> DomResult<Rect> {
        self.inner.lock().get(id).map(|d| d.layout)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a listener for `kind` events reaching `target`.
    pub fn add_event_listener<F>(&self, target: EventTarget, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let order = inner.next_listener_order;
        inner.next_listener_order += 1;
        let id = inner.listeners.insert(Listener {
            target,
            kind,
            handler: Arc::new(handler),
            order,
        });
        tracing::debug!(target: targets::EVENTS, ?id, ?target, %kind, "added event listener");
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let removed = self.inner.lock().listeners.remove(id).is_some();
        tracing::debug!(target: targets::EVENTS, ?id, removed, "removed event listener");
        removed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Number of listeners registered for `kind` on `target`.
    pub fn listener_count_for(&self, target: EventTarget, kind: EventKind) -> usize {
        self.inner
            .lock()
            .listeners
            .values()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Dispatch an event, then run a mutation checkpoint.
    ///
    /// Returns the number of listeners invoked.
    #[tracing::instrument(skip(self, event), target = "input_dropdown_core::events", level = "trace", fields(kind = %event.kind))]
    pub fn dispatch_event(&self, target: EventTarget, event: Event) -> usize {
        let path = self.inner.lock().propagation_path(target, event.kind);
        let invoked = self.dispatch_along(&path, &event);
        self.flush_mutations();
        invoked
    }

    fn dispatch_along(&self, path: &[EventTarget], event: &Event) -> usize {
        let handlers = self.inner.lock().collect_handlers(path, event.kind);
        tracing::trace!(target: targets::EVENTS, kind = %event.kind, handlers = handlers.len(), "dispatching event");
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Simulate the user replacing the value of a form control: sets the value
    /// and dispatches an `input` event at it.
    pub fn type_text(&self, id: ElementId, value: impl Into<String>) -> DomResult<usize> {
        self.set_value(id, value)?;
        Ok(self.dispatch_event(
            EventTarget::Element(id),
            Event::targeted(EventKind::Input, id),
        ))
    }

    /// Simulate a click on an element.
    pub fn click(&self, id: ElementId) -> DomResult<usize> {
        if !self.exists(id) {
            return Err(DomError::InvalidElementId);
        }
        Ok(self.dispatch_event(
            EventTarget::Element(id),
            Event::targeted(EventKind::Click, id),
        ))
    }

    /// Simulate a key press on an element.
    pub fn press_key(&self, id: ElementId, key: Key) -> DomResult<usize> {
        if !self.exists(id) {
            return Err(DomError::InvalidElementId);
        }
        Ok(self.dispatch_event(EventTarget::Element(id), Event::key_down(id, key)))
    }

    /// Fire a window-level event such as [`EventKind::Load`] or [`EventKind::Resize`].
    pub fn fire_window_event(&self, kind: EventKind) -> usize {
        self.dispatch_event(EventTarget::Window, Event::new(kind))
    }

    // =========================================================================
    // Mutation observation
    // =========================================================================

    /// Observe changes under `root`.
    ///
    /// Fails with [`DomError::MutationObserverUnsupported`] unless the
    /// document was created with [`MutationSupport::Observer`].
    pub fn observe_mutations<F>(
        &self,
        root: ElementId,
        init: MutationObserverInit,
        callback: F,
    ) -> DomResult<ObserverId>
    where
        F: Fn(&[MutationRecord]) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        if inner.support != MutationSupport::Observer {
            return Err(DomError::MutationObserverUnsupported);
        }
        inner.get(root)?;
        let callback: MutationCallback = Arc::new(callback);
        let id = inner.observers.insert(Observer {
            root,
            init,
            callback,
            pending: Vec::new(),
        });
        tracing::debug!(target: targets::MUTATION, ?id, ?root, ?init, "observing mutations");
        Ok(id)
    }

    /// Stop an observer and drop its pending records.
    pub fn disconnect_observer(&self, id: ObserverId) -> bool {
        self.inner.lock().observers.remove(id).is_some()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }

    /// Deliver queued mutation records and legacy mutation events until
    /// nothing is pending (the microtask checkpoint).
    ///
    /// Returns the number of records and legacy events delivered.
    pub fn flush_mutations(&self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_DELIVERY_ROUNDS {
            let (batches, legacy) = {
                let mut inner = self.inner.lock();
                let batches: Vec<(MutationCallback, Vec<MutationRecord>)> = inner
                    .observers
                    .values_mut()
                    .filter(|o| !o.pending.is_empty())
                    .map(|o| (o.callback.clone(), std::mem::take(&mut o.pending)))
                    .collect();
                let legacy = std::mem::take(&mut inner.pending_legacy);
                (batches, legacy)
            };

            if batches.is_empty() && legacy.is_empty() {
                return delivered;
            }

            for (callback, records) in &batches {
                tracing::trace!(target: targets::MUTATION, records = records.len(), "delivering mutation records");
                delivered += records.len();
                callback(records);
            }

            for pending in legacy {
                let path: Vec<EventTarget> = pending
                    .path
                    .iter()
                    .copied()
                    .map(EventTarget::Element)
                    .chain([EventTarget::Document, EventTarget::Window])
                    .collect();
                delivered += 1;
                self.dispatch_along(&path, &Event::targeted(pending.kind, pending.target));
            }
        }

        tracing::warn!(
            target: targets::MUTATION,
            rounds = MAX_DELIVERY_ROUNDS,
            "mutation delivery did not settle; observers keep mutating what they observe"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn attached(doc: &Document, tag: &str) -> ElementId {
        let el = doc.create_element(tag);
        doc.append_child(doc.body(), el).unwrap();
        el
    }

    #[test]
    fn new_document_has_html_and_body() {
        let doc = Document::new();
        let root = doc.document_element();
        assert_eq!(doc.tag_name(root).unwrap(), "html");
        assert_eq!(doc.children(root).unwrap(), vec![doc.body()]);
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn append_moves_between_parents() {
        let doc = Document::new();
        let a = attached(&doc, "div");
        let b = attached(&doc, "div");
        let child = doc.create_element("span");
        assert!(!doc.is_connected(child));

        doc.append_child(a, child).unwrap();
        doc.append_child(b, child).unwrap();

        assert!(doc.children(a).unwrap().is_empty());
        assert_eq!(doc.children(b).unwrap(), vec![child]);
        assert_eq!(doc.parent(child).unwrap(), Some(b));
        assert!(doc.is_connected(child));
    }

    #[test]
    fn append_rejects_cycles() {
        let doc = Document::new();
        let outer = attached(&doc, "div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();

        assert_eq!(doc.append_child(inner, outer), Err(DomError::CircularParentage));
        assert_eq!(doc.append_child(outer, outer), Err(DomError::CircularParentage));
        assert_eq!(
            doc.append_child(outer, doc.document_element()),
            Err(DomError::RootElement)
        );
    }

    #[test]
    fn destroy_drops_subtree_and_its_listeners() {
        let doc = Document::new();
        let outer = attached(&doc, "div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        doc.add_event_listener(EventTarget::Element(inner), EventKind::Click, |_| {});
        doc.add_event_listener(EventTarget::Document, EventKind::Click, |_| {});

        doc.destroy_element(outer).unwrap();

        assert!(!doc.exists(outer));
        assert!(!doc.exists(inner));
        assert_eq!(doc.listener_count(), 1);
        assert_eq!(doc.destroy_element(doc.body()), Err(DomError::RootElement));
    }

    #[test]
    fn contains_is_inclusive() {
        let doc = Document::new();
        let outer = attached(&doc, "div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();

        assert!(doc.contains(outer, outer));
        assert!(doc.contains(outer, inner));
        assert!(!doc.contains(inner, outer));
    }

    #[test]
    fn style_writes_report_changes() {
        let doc = Document::new();
        let el = attached(&doc, "div");

        assert!(doc.set_style(el, "width", "10px").unwrap());
        assert!(!doc.set_style(el, "width", "10px").unwrap());
        assert!(doc.set_style(el, "width", "12px").unwrap());
        doc.set_style(el, "left", "3px").unwrap();

        assert_eq!(doc.style(el, "width").unwrap().as_deref(), Some("12px"));
        assert_eq!(doc.style_text(el).unwrap(), "width: 12px; left: 3px;");
        assert!(doc.remove_style(el, "left").unwrap());
        assert_eq!(doc.style(el, "left").unwrap(), None);
    }

    #[test]
    fn class_list_has_no_duplicates() {
        let doc = Document::new();
        let el = doc.create_element("div");
        assert!(doc.add_class(el, "a").unwrap());
        assert!(!doc.add_class(el, "a").unwrap());
        assert!(doc.add_class(el, "b").unwrap());
        assert_eq!(doc.classes(el).unwrap(), vec!["a", "b"]);
        assert!(doc.remove_class(el, "a").unwrap());
        assert!(!doc.has_class(el, "a").unwrap());
    }

    #[test]
    fn content_serialization() {
        let doc = Document::new();
        let list = attached(&doc, "div");
        doc.add_class(list, "list").unwrap();
        let item = doc.create_element("div");
        doc.set_text_content(item, "a < b").unwrap();
        doc.append_child(list, item).unwrap();

        assert_eq!(doc.inner_html(item).unwrap(), "a &lt; b");
        assert_eq!(doc.text_content(list).unwrap(), "a < b");
        assert_eq!(
            doc.outer_html(list).unwrap(),
            "<div class=\"list\"><div>a &lt; b</div></div>"
        );
    }

    #[test]
    fn clear_children_destroys_them() {
        let doc = Document::new();
        let list = attached(&doc, "div");
        let item = doc.create_element("div");
        doc.append_child(list, item).unwrap();

        assert!(doc.clear_children(list).unwrap());
        assert!(!doc.exists(item));
        assert!(!doc.clear_children(list).unwrap());
    }

    #[test]
    fn click_bubbles_to_document_and_window() {
        let doc = Document::new();
        let outer = attached(&doc, "div");
        let inner = doc.create_element("span");
        doc.append_child(outer, inner).unwrap();

        let order = Arc::new(Mutex::new(Vec::new()));
        for (name, target) in [
            ("window", EventTarget::Window),
            ("document", EventTarget::Document),
            ("outer", EventTarget::Element(outer)),
            ("inner", EventTarget::Element(inner)),
        ] {
            let order = order.clone();
            doc.add_event_listener(target, EventKind::Click, move |event| {
                assert_eq!(event.target, Some(inner));
                order.lock().push(name);
            });
        }

        assert_eq!(doc.click(inner).unwrap(), 4);
        assert_eq!(*order.lock(), vec!["inner", "outer", "document", "window"]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let doc = Document::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let id = doc.add_event_listener(EventTarget::Window, EventKind::Resize, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        doc.fire_window_event(EventKind::Resize);
        assert!(doc.remove_event_listener(id));
        assert!(!doc.remove_event_listener(id));
        doc.fire_window_event(EventKind::Resize);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_reenter_document() {
        let doc = Document::new();
        let el = attached(&doc, "input");
        let handle = doc.clone();
        doc.add_event_listener(EventTarget::Element(el), EventKind::Input, move |event| {
            let target = event.target.unwrap();
            let value = handle.value(target).unwrap();
            handle.set_style(target, "width", &format!("{}px", value.len())).unwrap();
        });

        doc.type_text(el, "abc").unwrap();
        assert_eq!(doc.style(el, "width").unwrap().as_deref(), Some("3px"));
    }

    #[test]
    fn observer_receives_subtree_records_at_checkpoint() {
        let doc = Document::new();
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = records.clone();
        doc.observe_mutations(
            doc.document_element(),
            MutationObserverInit::everything(),
            move |batch| sink.lock().extend_from_slice(batch),
        )
        .unwrap();

        let el = attached(&doc, "div");
        doc.add_class(el, "x").unwrap();
        assert!(records.lock().is_empty());

        assert_eq!(doc.flush_mutations(), 2);
        let records = records.lock();
        assert!(matches!(&records[0], MutationRecord::ChildList { added, .. } if added == &vec![el]));
        assert!(matches!(&records[1], MutationRecord::Attributes { name, .. } if name == "class"));
    }

    #[test]
    fn detached_changes_are_not_observed() {
        let doc = Document::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        doc.observe_mutations(
            doc.document_element(),
            MutationObserverInit::everything(),
            move |batch| {
                counter.fetch_add(batch.len(), Ordering::SeqCst);
            },
        )
        .unwrap();

        let el = doc.create_element("div");
        doc.set_style(el, "top", "1px").unwrap();
        doc.flush_mutations();

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn observer_unsupported_without_capability() {
        let doc = Document::with_mutation_support(MutationSupport::LegacyEvents);
        let result = doc.observe_mutations(
            doc.document_element(),
            MutationObserverInit::everything(),
            |_| {},
        );
        assert_eq!(result, Err(DomError::MutationObserverUnsupported));
    }

    #[test]
    fn legacy_events_fire_for_insertion_and_removal() {
        let doc = Document::with_mutation_support(MutationSupport::LegacyEvents);
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in [EventKind::NodeInserted, EventKind::NodeRemoved] {
            let seen = seen.clone();
            doc.add_event_listener(
                EventTarget::Element(doc.document_element()),
                kind,
                move |event| seen.lock().push(event.kind),
            );
        }

        let el = attached(&doc, "div");
        doc.set_style(el, "top", "1px").unwrap();
        doc.detach(el).unwrap();
        doc.flush_mutations();

        assert_eq!(*seen.lock(), vec![EventKind::NodeInserted, EventKind::NodeRemoved]);
    }

    #[test]
    fn runaway_observer_is_bounded() {
        let doc = Document::new();
        let el = attached(&doc, "div");
        let handle = doc.clone();
        let rounds = Arc::new(AtomicUsize::new(0));
        let counter = rounds.clone();
        doc.observe_mutations(el, MutationObserverInit::everything(), move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            handle.set_style(el, "top", &format!("{n}px")).unwrap();
        })
        .unwrap();

        doc.set_style(el, "top", "start").unwrap();
        doc.flush_mutations();

        assert_eq!(rounds.load(Ordering::SeqCst), MAX_DELIVERY_ROUNDS);
    }

    #[test]
    fn element_info_reports_siblings() {
        let doc = Document::new();
        let a = attached(&doc, "DIV");
        let b = attached(&doc, "p");
        doc.set_element_id(b, "second").unwrap();

        let info = doc.element_info(b).unwrap();
        assert_eq!(info.tag, "p");
        assert_eq!(info.id.as_deref(), Some("second"));
        assert_eq!((info.sibling_index, info.sibling_count), (1, 2));
        assert_eq!(doc.element_info(a).unwrap().tag, "div");

        doc.set_attribute(b, "name", "q").unwrap();
        let info = doc.element_info(b).unwrap();
        assert_eq!(info.attributes, vec![("name".to_string(), "q".to_string())]);
    }
}
