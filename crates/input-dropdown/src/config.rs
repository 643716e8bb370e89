//! Dropdown configuration.
//!
//! A [`DropdownConfig`] is built in code or loaded from JSON or TOML using the
//! camelCase keys `selector`, `dropdownWidth`, `dropdownClass`, `data`,
//! `dataAliases`, `useKeywalk` and `markup`. Callbacks and the navigator
//! factory can only be set in code.
//!
//! # Example
//!
//! ```
//! use input_dropdown::{DataAliases, DropdownConfig};
//!
//! let config = DropdownConfig::from_json_str(r##"{
//!     "selector": "#search",
//!     "dropdownWidth": "300px",
//!     "dataAliases": { "img": "avatar", "text1": "name" },
//!     "useKeywalk": true
//! }"##).unwrap();
//!
//! assert_eq!(config.data_aliases, DataAliases::new().with_icon("avatar").with_title("name"));
//! assert!(config.use_keywalk);
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::aliases::DataAliases;
use crate::events::{ItemCallback, ItemEvent};
use crate::keywalk::NavigatorFactory;
use crate::markup::MarkupMode;
use crate::record::Record;
use crate::{Error, Result};

/// Construction parameters of an [`InputDropdown`](crate::InputDropdown).
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DropdownConfig {
    /// Selector of the input element.
    pub selector: String,
    /// Fixed CSS width. Defaults to the input's measured width.
    #[serde(default)]
    pub dropdown_width: Option<String>,
    /// Extra class added to the container.
    #[serde(default)]
    pub dropdown_class: Option<String>,
    /// Initial records.
    #[serde(default)]
    pub data: Vec<Record>,
    /// Which record fields back the item slots.
    pub data_aliases: DataAliases,
    /// Attach keyboard navigation once the dropdown is inserted.
    #[serde(default)]
    pub use_keywalk: bool,
    /// How record values are inserted.
    #[serde(default)]
    pub markup: MarkupMode,
    /// Called on every cursor movement.
    #[serde(skip)]
    pub on_walk: Option<ItemCallback>,
    /// Called when an item is selected.
    #[serde(skip)]
    pub on_select: Option<ItemCallback>,
    /// Navigator to use instead of [`Keywalk`](crate::Keywalk).
    #[serde(skip)]
    pub navigator: Option<NavigatorFactory>,
}

impl DropdownConfig {
    /// A configuration with the required fields.
    pub fn new(selector: impl Into<String>, data_aliases: DataAliases) -> Self {
        Self {
            selector: selector.into(),
            dropdown_width: None,
            dropdown_class: None,
            data: Vec::new(),
            data_aliases,
            use_keywalk: false,
            markup: MarkupMode::default(),
            on_walk: None,
            on_select: None,
            navigator: None,
        }
    }

    /// Set a fixed width using builder pattern.
    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.dropdown_width = Some(width.into());
        self
    }

    /// Set the extra container class using builder pattern.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.dropdown_class = Some(class.into());
        self
    }

    /// Set the initial records using builder pattern.
    pub fn with_data(mut self, data: Vec<Record>) -> Self {
        self.data = data;
        self
    }

    /// Enable or disable keyboard navigation using builder pattern.
    pub fn with_keywalk(mut self, enabled: bool) -> Self {
        self.use_keywalk = enabled;
        self
    }

    /// Set the markup policy using builder pattern.
    pub fn with_markup(mut self, markup: MarkupMode) -> Self {
        self.markup = markup;
        self
    }

    /// Set the walk callback using builder pattern.
    pub fn on_walk<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ItemEvent) + Send + Sync + 'static,
    {
        self.on_walk = Some(Arc::new(callback));
        self
    }

    /// Set the select callback using builder pattern.
    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ItemEvent) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(callback));
        self
    }

    /// Replace the default navigator using builder pattern.
    pub fn with_navigator(mut self, factory: NavigatorFactory) -> Self {
        self.navigator = Some(factory);
        self
    }

    /// Decode a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a TOML configuration.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Load a `.json` or `.toml` configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => {
                return Err(Error::invalid_config(format!(
                    "unsupported configuration file '{}': expected .json or .toml",
                    path.display()
                )));
            }
        };
        tracing::debug!(target: "input_dropdown::config", path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Reject configurations that cannot produce a working dropdown.
    ///
    /// An alias mapping with no slot is accepted; its items render empty.
    pub fn validate(&self) -> Result<()> {
        if self.selector.trim().is_empty() {
            return Err(Error::invalid_config("selector must not be empty"));
        }
        if self.data_aliases.is_empty() {
            tracing::warn!(
                target: "input_dropdown::config",
                selector = %self.selector,
                "dataAliases configures no slot; items will render empty"
            );
        }
        if self
            .dropdown_class
            .as_deref()
            .is_some_and(|class| class.is_empty() || class.contains(char::is_whitespace))
        {
            return Err(Error::invalid_config("dropdownClass must be a single class name"));
        }
        Ok(())
    }
}

impl fmt::Debug for DropdownConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownConfig")
            .field("selector", &self.selector)
            .field("dropdown_width", &self.dropdown_width)
            .field("dropdown_class", &self.dropdown_class)
            .field("data", &self.data.len())
            .field("data_aliases", &self.data_aliases)
            .field("use_keywalk", &self.use_keywalk)
            .field("markup", &self.markup)
            .field("on_walk", &self.on_walk.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("navigator", &self.navigator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builder_sets_fields() {
        let config = DropdownConfig::new("#q", DataAliases::new().with_title("name"))
            .with_width("20rem")
            .with_class("wide")
            .with_keywalk(true)
            .with_markup(MarkupMode::Raw)
            .on_select(|_| {});

        assert_eq!(config.dropdown_width.as_deref(), Some("20rem"));
        assert_eq!(config.dropdown_class.as_deref(), Some("wide"));
        assert!(config.use_keywalk);
        assert_eq!(config.markup, MarkupMode::Raw);
        assert!(config.on_select.is_some());
        assert!(config.on_walk.is_none());
    }

    #[test]
    fn json_defaults() {
        let config =
            DropdownConfig::from_json_str(r##"{"selector": "#q", "dataAliases": {"title": "t"}}"##).unwrap();
        assert!(config.data.is_empty());
        assert!(!config.use_keywalk);
        assert_eq!(config.markup, MarkupMode::Text);
        assert_eq!(config.dropdown_width, None);
    }

    #[test]
    fn toml_with_records() {
        let config = DropdownConfig::from_toml_str(
            r##"
            selector = "#people"
            dropdownClass = "people"
            markup = "raw"

            [dataAliases]
            text1 = "name"
            text2 = "role"

            [[data]]
            name = "Alice"
            role = "Admin"

            [[data]]
            name = "Bob"
            role = "User"
            "##,
        )
        .unwrap();

        assert_eq!(config.data.len(), 2);
        assert_eq!(config.data[1].get("name").and_then(|v| v.as_str()), Some("Bob"));
        assert_eq!(config.data_aliases.subtitle.as_deref(), Some("role"));
        assert_eq!(config.markup, MarkupMode::Raw);
    }

    #[test]
    fn missing_aliases_is_a_decode_error() {
        let result = DropdownConfig::from_json_str(r##"{"selector": "#q"}"##);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn from_file_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r##"{{"selector": "#a", "dataAliases": {{"icon": "i"}}}}"##).unwrap();
        assert_eq!(DropdownConfig::from_file(json.path()).unwrap().selector, "#a");

        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml, "selector = \"#b\"\n[dataAliases]\ntitle = \"t\"").unwrap();
        assert_eq!(DropdownConfig::from_file(toml.path()).unwrap().selector, "#b");

        let yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            DropdownConfig::from_file(yaml.path()),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            DropdownConfig::from_file("/no/such/dropdown.json"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn validation() {
        let aliases = DataAliases::new().with_title("t");
        assert!(DropdownConfig::new("#q", aliases.clone()).validate().is_ok());
        assert!(DropdownConfig::new("  ", aliases.clone()).validate().is_err());
        assert!(DropdownConfig::new("#q", DataAliases::new()).validate().is_ok());
        assert!(
            DropdownConfig::new("#q", aliases)
                .with_class("two classes")
                .validate()
                .is_err()
        );
    }
}
