//! The alias mapping from record fields to item slots.

use serde::{Deserialize, Serialize};

use crate::constants::{ITEM_ICON_CLASS, ITEM_SUBTITLE_CLASS, ITEM_TITLE_CLASS};

/// A block inside a rendered item.
///
/// Slots render in declaration order: icon, title, subtitle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// An image block whose background is the field value.
    Icon,
    /// The primary text line.
    Title,
    /// The secondary text line.
    Subtitle,
}

impl Slot {
    /// Every slot, in render order.
    pub const ALL: [Slot; 3] = [Slot::Icon, Slot::Title, Slot::Subtitle];

    /// The class carried by the slot's element.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Icon => ITEM_ICON_CLASS,
            Self::Title => ITEM_TITLE_CLASS,
            Self::Subtitle => ITEM_SUBTITLE_CLASS,
        }
    }
}

/// Which record field backs each slot.
///
/// A slot with no alias is not rendered for any record. Both naming
/// generations are accepted when deserializing: `icon`/`img`,
/// `title`/`text1` and `subtitle`/`text2`.
///
/// # Example
///
/// ```
/// use input_dropdown::DataAliases;
///
/// let aliases: DataAliases =
///     serde_json::from_str(r#"{"img": "avatar", "text1": "name"}"#).unwrap();
/// assert_eq!(aliases.icon.as_deref(), Some("avatar"));
/// assert_eq!(aliases.title.as_deref(), Some("name"));
/// assert_eq!(aliases.subtitle, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAliases {
    /// Field holding the icon URL.
    #[serde(default, alias = "img", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Field holding the title text.
    #[serde(default, alias = "text1", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Field holding the subtitle text.
    #[serde(default, alias = "text2", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl DataAliases {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map all three slots.
    pub fn full(
        icon: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self::new()
            .with_icon(icon)
            .with_title(title)
            .with_subtitle(subtitle)
    }

    /// Set the icon field using builder pattern.
    pub fn with_icon(mut self, field: impl Into<String>) -> Self {
        self.icon = Some(field.into());
        self
    }

    /// Set the title field using builder pattern.
    pub fn with_title(mut self, field: impl Into<String>) -> Self {
        self.title = Some(field.into());
        self
    }

    /// Set the subtitle field using builder pattern.
    pub fn with_subtitle(mut self, field: impl Into<String>) -> Self {
        self.subtitle = Some(field.into());
        self
    }

    /// The field configured for a slot.
    pub fn field(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Icon => self.icon.as_deref(),
            Slot::Title => self.title.as_deref(),
            Slot::Subtitle => self.subtitle.as_deref(),
        }
    }

    /// Configured slots with their fields, in render order.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, &str)> {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.field(slot).map(|field| (slot, field)))
    }

    /// Whether no slot is configured.
    pub fn is_empty(&self) -> bool {
        self.slots().next().is_none()
    }
}
