//! The dropdown widget controller.

use std::fmt;
use std::sync::{Arc, Weak};

use input_dropdown_core::{
    Document, ElementId, Event, EventKind, EventTarget, MutationObserverInit, MutationSupport, Signal,
};
use input_dropdown_style::parser::parse_selector_list;
use input_dropdown_style::query::DocumentQuery;
use input_dropdown_style::resolve::StyleEngine;
use input_dropdown_style::selector::{Selector, SelectorList};
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;

use crate::aliases::DataAliases;
use crate::config::DropdownConfig;
use crate::constants::{CONTAINER_CLASS, INSTANCE_CLASS_ATTEMPTS, INSTANCE_SUFFIX_LEN};
use crate::events::ItemEvent;
use crate::keywalk::{Keywalk, Navigator, NavigatorFactory, NavigatorParams};
use crate::markup::MarkupMode;
use crate::position::{DropdownPlacement, InputGeometry, PositionTracking};
use crate::record::Record;
use crate::render::render_items;
use crate::subscriptions::Subscriptions;
use crate::visibility::{Trigger, Visibility};
use crate::{Error, Result};

const TARGET: &str = "input_dropdown::widget";

/// A dropdown list bound to an input element.
///
/// The widget owns a container element that lists one item per record,
/// positioned directly below the input. Typing into the input shows the
/// list and clearing it hides it again; clicks outside both the input and
/// the list hide it. With keyboard navigation enabled, arrow keys walk the
/// items and Enter selects one, reported through [`walked`](Self::walked)
/// and [`selected`](Self::selected).
///
/// Every listener the widget registers is released by [`destroy`](Self::destroy),
/// which also removes the container. Dropping a live widget destroys it.
///
/// # Example
///
/// ```
/// use input_dropdown::prelude::*;
///
/// let doc = Document::new();
/// let input = doc.create_element("input");
/// doc.set_element_id(input, "people").unwrap();
/// doc.append_child(doc.body(), input).unwrap();
///
/// let dropdown = InputDropdown::new(
///     &doc,
///     DropdownConfig::new("#people", DataAliases::new().with_title("name")),
/// )
/// .unwrap();
///
/// dropdown.update_data(vec![record([("name", "Alice")])]).unwrap();
/// doc.type_text(input, "Al").unwrap();
/// assert!(dropdown.is_visible());
/// ```
pub struct InputDropdown {
    shared: Arc<Shared>,
}

static_assertions::assert_impl_all!(InputDropdown: Send, Sync);

struct Shared {
    this: Weak<Shared>,
    document: Document,
    input: ElementId,
    container: ElementId,
    instance_class: String,
    /// The input selector plus the instance class; a click whose target or an
    /// ancestor matches is inside.
    click_scope: SelectorList,
    dropdown_width: Option<String>,
    aliases: DataAliases,
    markup: MarkupMode,
    use_keywalk: bool,
    navigator_factory: NavigatorFactory,
    styles: Arc<StyleEngine>,
    tracking: PositionTracking,
    walked: Signal<ItemEvent>,
    selected: Signal<ItemEvent>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    data: Vec<Record>,
    geometry: InputGeometry,
    visibility: Visibility,
    rendered: bool,
    inserted: bool,
    navigator: Option<Arc<dyn Navigator>>,
    subscriptions: Subscriptions,
    destroyed: bool,
}

impl InputDropdown {
    /// Bind a dropdown to the first element matching `config.selector`.
    ///
    /// The container is created, classed and positioned but not inserted;
    /// initial data is rendered on the first reveal or the first
    /// [`update_data`](Self::update_data).
    pub fn new(document: &Document, config: DropdownConfig) -> Result<Self> {
        config.validate()?;
        let input_selector = parse_selector_list(&config.selector)?;
        let input = document
            .query_selector_parsed(&input_selector)
            .ok_or_else(|| Error::SelectorNotFound(config.selector.clone()))?;

        let instance_class = generate_instance_class(document, &mut rand::thread_rng())?;
        let mut click_scope = input_selector;
        click_scope.0.push(Selector::class(instance_class.clone()));

        let container = document.create_element("div");
        document.add_class(container, CONTAINER_CLASS)?;
        document.add_class(container, &instance_class)?;
        if let Some(class) = &config.dropdown_class {
            document.add_class(container, class)?;
        }
        document.set_style(container, "display", Visibility::Hidden.display_value())?;

        let geometry = InputGeometry::measure(document, input)?;
        DropdownPlacement::below(&geometry, config.dropdown_width.as_deref()).apply(document, container)?;

        let tracking = match document.mutation_support() {
            MutationSupport::Observer => PositionTracking::Observer,
            MutationSupport::LegacyEvents => PositionTracking::LegacyEvents,
            MutationSupport::Unsupported => PositionTracking::WindowOnly,
        };

        let styles = Arc::new(crate::stylesheet::default_engine()?);

        let DropdownConfig {
            dropdown_width,
            data,
            data_aliases,
            use_keywalk,
            markup,
            on_walk,
            on_select,
            navigator,
            ..
        } = config;

        let shared = Arc::new_cyclic(|this| Shared {
            this: this.clone(),
            document: document.clone(),
            input,
            container,
            instance_class,
            click_scope,
            dropdown_width,
            aliases: data_aliases,
            markup,
            use_keywalk,
            navigator_factory: navigator.unwrap_or_else(Keywalk::factory),
            styles,
            tracking,
            walked: Signal::new(),
            selected: Signal::new(),
            state: Mutex::new(State {
                data,
                geometry,
                ..State::default()
            }),
        });

        if let Some(callback) = on_walk {
            shared.walked.connect(move |event| callback(event));
        }
        if let Some(callback) = on_select {
            shared.selected.connect(move |event| callback(event));
        }
        shared.subscribe()?;

        tracing::debug!(
            target: TARGET,
            ?input,
            ?container,
            class = %shared.instance_class,
            ?tracking,
            "dropdown created"
        );
        Ok(Self { shared })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replace the data set and re-render immediately, even while hidden.
    ///
    /// The first render inserts the container into the body and attaches
    /// keyboard navigation when enabled.
    pub fn update_data(&self, data: Vec<Record>) -> Result<()> {
        self.shared.update_data(data)
    }

    /// Show the dropdown. Safe to call while visible.
    pub fn show_dropdown(&self) -> Result<()> {
        self.shared.show()
    }

    /// Hide the dropdown and reset the navigation cursor. The container stays
    /// in the document.
    pub fn hide_dropdown(&self) -> Result<()> {
        self.shared.hide()
    }

    /// Release every listener, dispose the navigator and remove the
    /// container. Later calls fail with [`Error::Destroyed`].
    pub fn destroy(&self) -> Result<()> {
        self.shared.destroy()
    }

    /// Re-measure the input and move the dropdown under it.
    ///
    /// Returns whether the container's placement changed.
    pub fn refresh_position(&self) -> Result<bool> {
        self.shared.refresh_position()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current state of the visibility state machine.
    pub fn visibility(&self) -> Visibility {
        self.shared.state.lock().visibility
    }

    /// Whether the dropdown is shown.
    pub fn is_visible(&self) -> bool {
        self.visibility().is_visible()
    }

    /// Whether the container is rendered by the document: connected and not
    /// hidden by its own or an ancestor's computed `display`.
    pub fn is_displayed(&self) -> bool {
        self.shared
            .styles
            .is_displayed(&self.shared.document, self.shared.container)
    }

    /// Whether the container has been inserted into the body.
    pub fn is_inserted(&self) -> bool {
        self.shared.state.lock().inserted
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.shared.state.lock().destroyed
    }

    /// Whether a navigator is attached.
    pub fn has_navigator(&self) -> bool {
        self.shared.state.lock().navigator.is_some()
    }

    /// The current data set.
    pub fn data(&self) -> Vec<Record> {
        self.shared.state.lock().data.clone()
    }

    /// The rendered item elements, in data order.
    pub fn items(&self) -> Vec<ElementId> {
        self.shared
            .document
            .children(self.shared.container)
            .unwrap_or_default()
    }

    /// Last measured geometry of the input.
    pub fn geometry(&self) -> InputGeometry {
        self.shared.state.lock().geometry
    }

    /// How layout changes are tracked in this document.
    pub fn position_tracking(&self) -> PositionTracking {
        self.shared.tracking
    }

    /// The bound input element.
    pub fn input(&self) -> ElementId {
        self.shared.input
    }

    /// The container element.
    pub fn container(&self) -> ElementId {
        self.shared.container
    }

    /// The generated class unique to this instance.
    pub fn instance_class(&self) -> &str {
        &self.shared.instance_class
    }

    /// The document the widget lives in.
    pub fn document(&self) -> &Document {
        &self.shared.document
    }

    /// The style engine used to resolve the container's display.
    pub fn style_engine(&self) -> &StyleEngine {
        &self.shared.styles
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted when the navigation cursor moves.
    pub fn walked(&self) -> &Signal<ItemEvent> {
        &self.shared.walked
    }

    /// Emitted when an item is selected.
    pub fn selected(&self) -> &Signal<ItemEvent> {
        &self.shared.selected
    }
}

impl Drop for InputDropdown {
    fn drop(&mut self) {
        if !self.is_destroyed() {
            if let Err(e) = self.shared.destroy() {
                tracing::warn!(target: TARGET, error = %e, "failed to destroy dropdown on drop");
            }
        }
    }
}

impl fmt::Debug for InputDropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("InputDropdown")
            .field("input", &self.shared.input)
            .field("container", &self.shared.container)
            .field("instance_class", &self.shared.instance_class)
            .field("visibility", &state.visibility)
            .field("records", &state.data.len())
            .field("inserted", &state.inserted)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl Shared {
    fn live_state(&self) -> Result<MutexGuard<'_, State>> {
        let state = self.state.lock();
        if state.destroyed {
            return Err(Error::Destroyed);
        }
        Ok(state)
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    fn subscribe(&self) -> Result<()> {
        let document = &self.document;
        let mut subscriptions = Subscriptions::new();

        for kind in [EventKind::Load, EventKind::Resize] {
            let weak = self.this.clone();
            subscriptions.listen(document.add_event_listener(EventTarget::Window, kind, move |_| {
                if let Some(shared) = weak.upgrade() {
                    shared.reposition(kind.as_str());
                }
            }));
        }

        match self.tracking {
            PositionTracking::Observer => {
                let weak = self.this.clone();
                let observer = document.observe_mutations(
                    document.document_element(),
                    MutationObserverInit::everything(),
                    move |_| {
                        if let Some(shared) = weak.upgrade() {
                            shared.reposition("mutation");
                        }
                    },
                )?;
                subscriptions.observe(observer);
            }
            PositionTracking::LegacyEvents => {
                for kind in [EventKind::NodeInserted, EventKind::NodeRemoved] {
                    let weak = self.this.clone();
                    subscriptions.listen(document.add_event_listener(
                        EventTarget::Element(document.document_element()),
                        kind,
                        move |_| {
                            if let Some(shared) = weak.upgrade() {
                                shared.reposition(kind.as_str());
                            }
                        },
                    ));
                }
            }
            PositionTracking::WindowOnly => {
                tracing::debug!(
                    target: TARGET,
                    "mutation tracking unavailable; position follows window load and resize only"
                );
            }
        }

        let weak = self.this.clone();
        subscriptions.listen(document.add_event_listener(
            EventTarget::Element(self.input),
            EventKind::Input,
            move |_| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_input();
                }
            },
        ));

        let weak = self.this.clone();
        subscriptions.listen(document.add_event_listener(
            EventTarget::Document,
            EventKind::Click,
            move |event: &Event| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_click(event.target);
                }
            },
        ));

        self.state.lock().subscriptions = subscriptions;
        Ok(())
    }

    fn input_is_empty(&self) -> bool {
        self.document
            .value(self.input)
            .map(|value| value.is_empty())
            .unwrap_or(true)
    }

    fn on_input(&self) {
        self.apply(Trigger::Input {
            value_empty: self.input_is_empty(),
        });
    }

    fn on_click(&self, target: Option<ElementId>) {
        let inside = target.is_some_and(|target| {
            self.document
                .closest_parsed(target, &self.click_scope)
                .is_some()
        });
        self.apply(Trigger::Click {
            inside,
            value_empty: self.input_is_empty(),
        });
    }

    fn apply(&self, trigger: Trigger) {
        let result = match trigger.target() {
            Some(Visibility::Visible) => self.show(),
            Some(Visibility::Hidden) => self.hide(),
            None => Ok(()),
        };
        match result {
            Ok(()) | Err(Error::Destroyed) => {}
            Err(e) => tracing::warn!(target: TARGET, ?trigger, error = %e, "failed to apply trigger"),
        }
    }

    fn reposition(&self, cause: &str) {
        match self.refresh_position() {
            Ok(changed) => tracing::trace!(target: TARGET, cause, changed, "repositioned"),
            Err(Error::Destroyed) => {}
            Err(e) => tracing::warn!(target: TARGET, cause, error = %e, "failed to reposition"),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    fn refresh_position(&self) -> Result<bool> {
        let mut state = self.live_state()?;
        let geometry = InputGeometry::measure(&self.document, self.input)?;
        state.geometry = geometry;
        let placement = DropdownPlacement::below(&geometry, self.dropdown_width.as_deref());
        Ok(placement.apply(&self.document, self.container)?)
    }

    fn update_data(&self, data: Vec<Record>) -> Result<()> {
        let (inserted_now, navigator) = {
            let mut state = self.live_state()?;
            state.data = data;
            (self.render(&mut state)?, state.navigator.clone())
        };
        if inserted_now {
            self.attach_navigator()?;
        } else if let Some(navigator) = navigator {
            // The cursor pointed into the items that were just replaced.
            navigator.reset();
        }
        Ok(())
    }

    fn show(&self) -> Result<()> {
        let inserted_now = {
            let mut state = self.live_state()?;
            let inserted_now = if state.rendered { false } else { self.render(&mut state)? };
            self.set_visibility(&mut state, Visibility::Visible)?;
            inserted_now
        };
        if inserted_now {
            self.attach_navigator()?;
        }
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        let navigator = {
            let mut state = self.live_state()?;
            self.set_visibility(&mut state, Visibility::Hidden)?;
            state.navigator.clone()
        };
        if let Some(navigator) = navigator {
            navigator.reset();
        }
        Ok(())
    }

    fn destroy(&self) -> Result<()> {
        let (navigator, mut subscriptions) = {
            let mut state = self.live_state()?;
            state.destroyed = true;
            state.visibility = Visibility::Hidden;
            (state.navigator.take(), std::mem::take(&mut state.subscriptions))
        };

        subscriptions.release(&self.document);
        if let Some(navigator) = navigator {
            navigator.dispose();
        }
        self.walked.disconnect_all();
        self.selected.disconnect_all();
        if self.document.exists(self.container) {
            self.document.destroy_element(self.container)?;
        }
        tracing::debug!(target: TARGET, class = %self.instance_class, "dropdown destroyed");
        Ok(())
    }

    /// Render the data set. Returns whether this render inserted the
    /// container.
    fn render(&self, state: &mut State) -> Result<bool> {
        render_items(
            &self.document,
            self.container,
            &state.data,
            &self.aliases,
            self.markup,
        )?;
        state.rendered = true;
        if state.inserted {
            return Ok(false);
        }

        self.document.append_child(self.document.body(), self.container)?;
        state.inserted = true;
        tracing::debug!(target: TARGET, class = %self.instance_class, "dropdown inserted");
        Ok(true)
    }

    fn set_visibility(&self, state: &mut State, visibility: Visibility) -> Result<()> {
        self.document
            .set_style(self.container, "display", visibility.display_value())?;
        if state.visibility != visibility {
            tracing::debug!(target: TARGET, from = %state.visibility, to = %visibility, "visibility changed");
            state.visibility = visibility;
        }
        Ok(())
    }

    /// Build the navigator once the container is in the document. Runs
    /// without the state lock since the factory is caller code.
    fn attach_navigator(&self) -> Result<()> {
        if !self.use_keywalk {
            return Ok(());
        }

        let walk = self.this.clone();
        let select = self.this.clone();
        let params = NavigatorParams {
            document: self.document.clone(),
            trigger: self.input,
            container: self.container,
            on_walk: Arc::new(move |element, index| {
                if let Some(shared) = walk.upgrade() {
                    shared.forward(&shared.walked, element, index);
                }
            }),
            on_select: Arc::new(move |element, index| {
                if let Some(shared) = select.upgrade() {
                    shared.forward(&shared.selected, element, index);
                }
            }),
            styles: self.styles.clone(),
        };
        let navigator: Arc<dyn Navigator> = Arc::from((self.navigator_factory)(params));

        match self.live_state() {
            Ok(mut state) => {
                state.navigator = Some(navigator);
                tracing::debug!(target: TARGET, "navigator attached");
                Ok(())
            }
            Err(e) => {
                navigator.dispose();
                Err(e)
            }
        }
    }

    /// Emit a navigation event enriched with the record at `index`.
    fn forward(&self, signal: &Signal<ItemEvent>, element: ElementId, index: usize) {
        let record = self.state.lock().data.get(index).cloned();
        signal.emit(ItemEvent {
            element,
            index,
            record,
        });
    }
}

/// Generate `inpd-dropdown-container-` plus random base-36 characters,
/// retrying while an element in the document already carries the class.
pub fn generate_instance_class<R: Rng>(document: &Document, rng: &mut R) -> Result<String> {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    for _ in 0..INSTANCE_CLASS_ATTEMPTS {
        let suffix: String = (0..INSTANCE_SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        let class = format!("{}-{}", CONTAINER_CLASS, suffix);
        if document.query_selector(&format!(".{}", class))?.is_none() {
            return Ok(class);
        }
        tracing::debug!(target: TARGET, %class, "instance class in use, regenerating");
    }
    Err(Error::invalid_config("could not generate a unique instance class"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn instance_class_shape() {
        let doc = Document::new();
        let class = generate_instance_class(&doc, &mut StdRng::seed_from_u64(7)).unwrap();
        let suffix = class.strip_prefix("inpd-dropdown-container-").unwrap();
        assert_eq!(suffix.len(), INSTANCE_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn instance_class_regenerates_on_collision() {
        let doc = Document::new();
        let taken = generate_instance_class(&doc, &mut StdRng::seed_from_u64(42)).unwrap();
        let el = doc.create_element("div");
        doc.add_class(el, &taken).unwrap();
        doc.append_child(doc.body(), el).unwrap();

        let fresh = generate_instance_class(&doc, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_ne!(fresh, taken);
    }
}
