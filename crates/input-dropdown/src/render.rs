//! Rendering records into item elements.

use input_dropdown_core::logging::PerfSpan;
use input_dropdown_core::{Document, DomResult, ElementId};

use crate::aliases::{DataAliases, Slot};
use crate::constants::ITEM_CLASS;
use crate::markup::MarkupMode;
use crate::record::{Record, field_text};

/// Replace the container's content with one item per record, in data order.
///
/// Each item holds the configured slots in the fixed order icon, title,
/// subtitle. Returns the created items.
#[tracing::instrument(skip_all, target = "input_dropdown::render", level = "debug", fields(records = records.len()))]
pub fn render_items(
    document: &Document,
    container: ElementId,
    records: &[Record],
    aliases: &DataAliases,
    markup: MarkupMode,
) -> DomResult<Vec<ElementId>> {
    let _perf = PerfSpan::new("render_items");
    document.clear_children(container)?;

    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let item = document.create_element("div");
        document.add_class(item, ITEM_CLASS)?;

        for (slot, field) in aliases.slots() {
            let block = document.create_element("div");
            document.add_class(block, slot.class_name())?;
            let value = field_text(record, field);
            match slot {
                Slot::Icon => {
                    document.set_style(block, "background-image", &markup.background_image(&value))?;
                }
                Slot::Title | Slot::Subtitle => markup.apply(document, block, value)?,
            }
            document.append_child(item, block)?;
        }

        document.append_child(container, item)?;
        tracing::trace!(target: "input_dropdown::render", index, ?item, "rendered item");
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ITEM_ICON_CLASS, ITEM_SUBTITLE_CLASS, ITEM_TITLE_CLASS};
    use crate::record::record;

    fn people() -> Vec<Record> {
        vec![
            record([("img", "a.png"), ("text1", "Alice"), ("text2", "Admin")]),
            record([("img", "b.png"), ("text1", "Bob"), ("text2", "User")]),
        ]
    }

    fn slot_classes(doc: &Document, item: ElementId) -> Vec<String> {
        doc.children(item)
            .unwrap()
            .into_iter()
            .map(|block| doc.classes(block).unwrap().join(" "))
            .collect()
    }

    #[test]
    fn renders_every_slot_in_order() {
        let doc = Document::new();
        let container = doc.create_element("div");
        let aliases = DataAliases::full("img", "text1", "text2");

        let items = render_items(&doc, container, &people(), &aliases, MarkupMode::Text).unwrap();

        assert_eq!(items, doc.children(container).unwrap());
        for &item in &items {
            assert!(doc.has_class(item, ITEM_CLASS).unwrap());
            assert_eq!(
                slot_classes(&doc, item),
                vec![ITEM_ICON_CLASS, ITEM_TITLE_CLASS, ITEM_SUBTITLE_CLASS]
            );
        }
        let bob = doc.children(items[1]).unwrap();
        assert_eq!(doc.text_content(bob[1]).unwrap(), "Bob");
        assert_eq!(doc.text_content(bob[2]).unwrap(), "User");
        assert_eq!(
            doc.style(bob[0], "background-image").unwrap().as_deref(),
            Some(r#"url("b.png")"#)
        );
    }

    #[test]
    fn missing_alias_drops_the_slot() {
        let doc = Document::new();
        let container = doc.create_element("div");
        let aliases = DataAliases::new().with_icon("img").with_subtitle("text2");

        let items = render_items(&doc, container, &people(), &aliases, MarkupMode::Text).unwrap();
        for &item in &items {
            assert_eq!(slot_classes(&doc, item), vec![ITEM_ICON_CLASS, ITEM_SUBTITLE_CLASS]);
        }
    }

    #[test]
    fn rerender_replaces_previous_items() {
        let doc = Document::new();
        let container = doc.create_element("div");
        let aliases = DataAliases::new().with_title("text1");

        let first = render_items(&doc, container, &people(), &aliases, MarkupMode::Text).unwrap();
        let second = render_items(&doc, container, &people()[..1], &aliases, MarkupMode::Text).unwrap();

        assert_eq!(doc.children(container).unwrap(), second);
        assert!(first.iter().all(|&item| !doc.exists(item)));
    }

    #[test]
    fn empty_data_clears_container() {
        let doc = Document::new();
        let container = doc.create_element("div");
        let aliases = DataAliases::new().with_title("text1");

        render_items(&doc, container, &people(), &aliases, MarkupMode::Raw).unwrap();
        render_items(&doc, container, &[], &aliases, MarkupMode::Raw).unwrap();
        assert!(doc.children(container).unwrap().is_empty());
    }
}
