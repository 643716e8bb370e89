//! Payloads of the walk and select notifications.

use std::sync::Arc;

use input_dropdown_core::ElementId;

use crate::record::Record;

/// A navigation event over one rendered item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEvent {
    /// The item element.
    pub element: ElementId,
    /// Index of the item, equal to the index of its record.
    pub index: usize,
    /// The record at `index` in the current data set, if there is one.
    pub record: Option<Record>,
}

/// A caller callback for walk or select events.
pub type ItemCallback = Arc<dyn Fn(&ItemEvent) + Send + Sync>;
