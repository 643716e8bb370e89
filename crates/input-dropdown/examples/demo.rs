//! Input Dropdown Demo
//!
//! Drives a dropdown on a headless document and prints the element tree
//! after each step:
//! - Typing into the input reveals the list
//! - Arrow keys walk the items, Enter selects one
//! - A click elsewhere hides the list
//!
//! Run with: cargo run -p input-dropdown --example demo
//! Set `RUST_LOG=input_dropdown=debug` for widget logs.

use input_dropdown::prelude::*;
use input_dropdown_core::{DocumentTreeDebug, TreeFormatOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let doc = Document::new();
    let input = doc.create_element("input");
    doc.set_element_id(input, "people")?;
    doc.append_child(doc.body(), input)?;
    doc.set_layout_rect(input, Rect::new(24.0, 48.0, 280.0, 36.0))?;

    let elsewhere = doc.create_element("button");
    doc.append_child(doc.body(), elsewhere)?;

    let config = DropdownConfig::new("#people", DataAliases::full("img", "text1", "text2"))
        .with_width("320px")
        .with_keywalk(true)
        .on_walk(|event| tracing::info!(index = event.index, "walked"))
        .on_select(|event| {
            let name = event
                .record
                .as_ref()
                .and_then(|record| record.get("text1"))
                .and_then(|value| value.as_str())
                .unwrap_or_default();
            tracing::info!(index = event.index, name, "selected");
        });
    let dropdown = InputDropdown::new(&doc, config)?;

    dropdown.update_data(vec![
        record([("img", "https://example.com/alice.png"), ("text1", "Alice"), ("text2", "Admin")]),
        record([("img", "https://example.com/bob.png"), ("text1", "Bob"), ("text2", "User")]),
        record([("img", "https://example.com/carol.png"), ("text1", "Carol"), ("text2", "User")]),
    ])?;

    let tree = DocumentTreeDebug::with_options(TreeFormatOptions {
        show_styles: true,
        ..Default::default()
    });

    doc.type_text(input, "a")?;
    println!("After typing:\n{}", tree.format_all(&doc)?);

    doc.press_key(input, Key::ArrowDown)?;
    doc.press_key(input, Key::ArrowDown)?;
    doc.press_key(input, Key::Enter)?;

    doc.set_layout_rect(input, Rect::new(24.0, 120.0, 280.0, 36.0))?;
    doc.fire_window_event(EventKind::Resize);
    println!("After resize:\n{}", tree.format_subtree(&doc, dropdown.container())?);

    doc.click(elsewhere)?;
    println!("Visibility after outside click: {}", dropdown.visibility());

    dropdown.destroy()?;
    println!("Listeners left after destroy: {}", doc.listener_count());
    Ok(())
}
