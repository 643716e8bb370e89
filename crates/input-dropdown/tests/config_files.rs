//! Building dropdowns from configuration files.

use std::io::Write;

use input_dropdown::prelude::*;
use input_dropdown::Error;

fn page() -> Document {
    let doc = Document::new();
    let input = doc.create_element("input");
    doc.set_element_id(input, "people").unwrap();
    doc.add_class(input, "search").unwrap();
    doc.append_child(doc.body(), input).unwrap();
    doc
}

#[test]
fn json_file_with_initial_data() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r##"{{
            "selector": "input.search",
            "dropdownWidth": "18em",
            "dataAliases": {{ "img": "avatar", "text1": "name" }},
            "data": [
                {{ "avatar": "a.png", "name": "Alice" }},
                {{ "avatar": "b.png", "name": "Bob", "ignored": [1, 2] }}
            ],
            "useKeywalk": true
        }}"##
    )
    .unwrap();

    let doc = page();
    let config = DropdownConfig::from_file(file.path()).unwrap();
    let dropdown = InputDropdown::new(&doc, config).unwrap();
    dropdown.show_dropdown().unwrap();

    assert_eq!(dropdown.items().len(), 2);
    assert!(dropdown.has_navigator());
    assert_eq!(doc.style(dropdown.container(), "width").unwrap().as_deref(), Some("18em"));
    let bob = doc.children(dropdown.items()[1]).unwrap();
    assert_eq!(bob.len(), 2);
    assert_eq!(doc.text_content(bob[1]).unwrap(), "Bob");
}

#[test]
fn toml_file_with_extra_class() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r##"
selector = "#people"
dropdownClass = "people-list"
markup = "raw"

[dataAliases]
title = "name"
subtitle = "role"
"##
    )
    .unwrap();

    let doc = page();
    let dropdown = InputDropdown::new(&doc, DropdownConfig::from_file(file.path()).unwrap()).unwrap();
    assert!(doc.has_class(dropdown.container(), "people-list").unwrap());

    dropdown
        .update_data(vec![record([("name", "<em>Alice</em>"), ("role", "Admin")])])
        .unwrap();
    let alice = doc.children(dropdown.items()[0]).unwrap();
    assert_eq!(doc.inner_html(alice[0]).unwrap(), "<em>Alice</em>");
}

#[test]
fn unknown_keys_are_rejected() {
    let result = DropdownConfig::from_json_str(
        r##"{"selector": "#people", "dataAliases": {"title": "name"}, "dropdownColour": "red"}"##,
    );
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn invalid_selector_is_a_style_error() {
    let doc = page();
    let result = InputDropdown::new(&doc, DropdownConfig::new("#", DataAliases::new().with_title("name")));
    assert!(matches!(result, Err(Error::Style(_))));
}
