//! Keyboard navigation through a live dropdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use input_dropdown::constants::ITEM_ACTIVE_CLASS;
use input_dropdown::prelude::*;
use input_dropdown::{Error, NavigatorFactory};
use input_dropdown_core::ElementId;
use parking_lot::Mutex;

fn page() -> (Document, ElementId) {
    let doc = Document::new();
    let input = doc.create_element("input");
    doc.set_element_id(input, "search").unwrap();
    doc.append_child(doc.body(), input).unwrap();
    doc.set_layout_rect(input, Rect::new(0.0, 0.0, 200.0, 20.0)).unwrap();
    (doc, input)
}

fn people() -> Vec<Record> {
    vec![
        record([("img", "a.png"), ("text1", "Alice"), ("text2", "Admin")]),
        record([("img", "b.png"), ("text1", "Bob"), ("text2", "User")]),
        record([("img", "c.png"), ("text1", "Carol"), ("text2", "User")]),
    ]
}

fn config() -> DropdownConfig {
    DropdownConfig::new("#search", DataAliases::full("img", "text1", "text2"))
        .with_data(people())
        .with_keywalk(true)
}

fn collect(signal: &input_dropdown_core::Signal<ItemEvent>) -> Arc<Mutex<Vec<ItemEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    signal.connect(move |event: &ItemEvent| sink.lock().push(event.clone()));
    events
}

fn title(event: &ItemEvent) -> Option<&str> {
    event.record.as_ref()?.get("text1")?.as_str()
}

#[test]
fn navigator_attaches_on_first_insertion() {
    let (doc, input) = page();
    let dropdown = InputDropdown::new(&doc, config()).unwrap();
    assert!(!dropdown.has_navigator());

    doc.type_text(input, "a").unwrap();
    assert!(dropdown.has_navigator());
    let listeners = doc.listener_count();

    dropdown.update_data(people()).unwrap();
    doc.type_text(input, "ab").unwrap();
    assert_eq!(doc.listener_count(), listeners);
}

#[test]
fn walk_and_select_report_records() {
    let (doc, input) = page();
    let dropdown = InputDropdown::new(&doc, config()).unwrap();
    let walks = collect(dropdown.walked());
    let selects = collect(dropdown.selected());

    doc.type_text(input, "b").unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    doc.press_key(input, Key::Enter).unwrap();

    let items = dropdown.items();
    let walks = walks.lock();
    assert_eq!(walks.len(), 2);
    assert_eq!(walks[0].index, 0);
    assert_eq!(walks[0].element, items[0]);
    assert_eq!(title(&walks[0]), Some("Alice"));
    assert_eq!(title(&walks[1]), Some("Bob"));

    let selects = selects.lock();
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0].index, 1);
    assert_eq!(selects[0].element, items[1]);
    assert_eq!(title(&selects[0]), Some("Bob"));
}

#[test]
fn config_callbacks_receive_events() {
    let (doc, input) = page();
    let walked = Arc::new(AtomicUsize::new(0));
    let selected = Arc::new(Mutex::new(None));
    let walked_clone = walked.clone();
    let selected_clone = selected.clone();

    let _dropdown = InputDropdown::new(
        &doc,
        config()
            .on_walk(move |_| {
                walked_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_select(move |event| *selected_clone.lock() = Some(event.index)),
    )
    .unwrap();

    doc.type_text(input, "c").unwrap();
    doc.press_key(input, Key::ArrowUp).unwrap();
    doc.press_key(input, Key::Enter).unwrap();

    assert_eq!(walked.load(Ordering::SeqCst), 1);
    assert_eq!(*selected.lock(), Some(2));
}

#[test]
fn hiding_resets_the_cursor() {
    let (doc, input) = page();
    let dropdown = InputDropdown::new(&doc, config()).unwrap();
    let walks = collect(dropdown.walked());

    doc.type_text(input, "a").unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    let second = dropdown.items()[1];
    assert!(doc.has_class(second, ITEM_ACTIVE_CLASS).unwrap());

    doc.type_text(input, "").unwrap();
    assert!(!doc.has_class(second, ITEM_ACTIVE_CLASS).unwrap());

    doc.press_key(input, Key::ArrowDown).unwrap();
    assert_eq!(walks.lock().len(), 2);

    doc.type_text(input, "a").unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    assert_eq!(walks.lock().last().map(|e| e.index), Some(0));
}

#[test]
fn new_data_while_visible_clears_the_cursor() {
    let (doc, input) = page();
    let dropdown = InputDropdown::new(&doc, config()).unwrap();
    let walks = collect(dropdown.walked());
    let selects = collect(dropdown.selected());

    doc.type_text(input, "a").unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();

    dropdown
        .update_data(vec![record([("text1", "Xavier")]), record([("text1", "Yvonne")])])
        .unwrap();
    assert!(dropdown.is_visible());
    assert!(
        dropdown
            .items()
            .iter()
            .all(|&item| !doc.has_class(item, ITEM_ACTIVE_CLASS).unwrap())
    );

    doc.press_key(input, Key::Enter).unwrap();
    assert!(selects.lock().is_empty());

    doc.press_key(input, Key::ArrowDown).unwrap();
    doc.press_key(input, Key::Enter).unwrap();
    assert_eq!(walks.lock().last().map(|e| e.index), Some(0));
    let selects = selects.lock();
    assert_eq!(selects.len(), 1);
    assert_eq!(title(&selects[0]), Some("Xavier"));
    assert!(doc.has_class(dropdown.items()[0], ITEM_ACTIVE_CLASS).unwrap());
}

#[test]
fn without_keywalk_keys_do_nothing() {
    let (doc, input) = page();
    let dropdown = InputDropdown::new(&doc, config().with_keywalk(false)).unwrap();
    let walks = collect(dropdown.walked());

    doc.type_text(input, "a").unwrap();
    doc.press_key(input, Key::ArrowDown).unwrap();
    doc.press_key(input, Key::Enter).unwrap();

    assert!(!dropdown.has_navigator());
    assert!(walks.lock().is_empty());
}

#[derive(Default)]
struct Recorded {
    built: Mutex<Vec<NavigatorParams>>,
    resets: AtomicUsize,
    disposals: AtomicUsize,
}

struct RecordingNavigator(Arc<Recorded>);

impl Navigator for RecordingNavigator {
    fn reset(&self) {
        self.0.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn dispose(&self) {
        self.0.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

fn recording_factory(recorded: Arc<Recorded>) -> NavigatorFactory {
    Arc::new(move |params: NavigatorParams| -> Box<dyn Navigator> {
        recorded.built.lock().push(params);
        Box::new(RecordingNavigator(recorded.clone()))
    })
}

#[test]
fn custom_navigator_is_driven_by_the_widget() {
    let (doc, input) = page();
    let recorded = Arc::new(Recorded::default());
    let dropdown = InputDropdown::new(
        &doc,
        config().with_navigator(recording_factory(recorded.clone())),
    )
    .unwrap();
    let selects = collect(dropdown.selected());

    doc.type_text(input, "a").unwrap();
    doc.type_text(input, "ab").unwrap();
    assert_eq!(recorded.built.lock().len(), 1);

    let params = recorded.built.lock()[0].clone();
    assert_eq!(params.trigger, input);
    assert_eq!(params.container, dropdown.container());

    let items = dropdown.items();
    (params.on_select)(items[2], 2);
    assert_eq!(selects.lock().len(), 1);
    assert_eq!(title(&selects.lock()[0]), Some("Carol"));

    doc.type_text(input, "").unwrap();
    dropdown.hide_dropdown().unwrap();
    assert_eq!(recorded.resets.load(Ordering::SeqCst), 2);

    dropdown.destroy().unwrap();
    assert_eq!(recorded.disposals.load(Ordering::SeqCst), 1);
    assert!(matches!(dropdown.destroy(), Err(Error::Destroyed)));

    (params.on_select)(items[0], 0);
    assert_eq!(selects.lock().len(), 1);
}
