//! Input measurement and dropdown placement.

use input_dropdown_core::{Document, DomResult, ElementId, Rect};

/// Snapshot of the input's layout box, recomputed whenever layout may have
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputGeometry {
    /// Left offset in CSS pixels.
    pub left: f32,
    /// Top offset in CSS pixels.
    pub top: f32,
    /// Measured width.
    pub width: f32,
    /// Measured height.
    pub height: f32,
}

impl InputGeometry {
    /// Measure an element.
    pub fn measure(document: &Document, input: ElementId) -> DomResult<Self> {
        Ok(document.bounding_client_rect(input)?.into())
    }
}

impl From<Rect> for InputGeometry {
    fn from(rect: Rect) -> Self {
        Self {
            left: rect.left(),
            top: rect.top(),
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Where to track layout changes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionTracking {
    /// A mutation observer on the document root.
    Observer,
    /// Legacy node insertion and removal events.
    LegacyEvents,
    /// Only window load and resize; mutations are not tracked.
    WindowOnly,
}

/// Inline style values placing the dropdown under the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownPlacement {
    /// The `width` value.
    pub width: String,
    /// The `left` value.
    pub left: String,
    /// The `top` value.
    pub top: String,
}

impl DropdownPlacement {
    /// Left-aligned with the input and directly below it. A fixed width
    /// wins over the measured one.
    pub fn below(geometry: &InputGeometry, fixed_width: Option<&str>) -> Self {
        Self {
            width: match fixed_width {
                Some(width) => width.to_string(),
                None => px(geometry.width),
            },
            left: px(geometry.left),
            top: px(geometry.top + geometry.height),
        }
    }

    /// Write the placement to the container's inline style.
    ///
    /// Returns whether any value changed. Unchanged values are not written,
    /// so repositioning from a mutation callback settles after one round.
    pub fn apply(&self, document: &Document, container: ElementId) -> DomResult<bool> {
        let mut changed = false;
        for (property, value) in [("width", &self.width), ("left", &self.left), ("top", &self.top)] {
            changed |= document.set_style(container, property, value)?;
        }
        Ok(changed)
    }
}

fn px(value: f32) -> String {
    format!("{}px", value)
}
