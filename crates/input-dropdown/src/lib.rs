//! An input field dropdown.
//!
//! [`InputDropdown`] binds a list of records to an input element:
//!
//! - **Rendering**: One item per record with icon, title and subtitle slots,
//!   mapped from record fields through [`DataAliases`]
//! - **Positioning**: The list sits directly below the input and follows it
//!   on window load, resize and document mutations
//! - **Visibility**: Typing shows the list, clearing the input or clicking
//!   elsewhere hides it
//! - **Keyboard Navigation**: Optional arrow-key walking and Enter to select,
//!   reported through signals and callbacks
//! - **Configuration**: Built in code or loaded from JSON and TOML files
//!
//! # Example
//!
//! ```
//! use input_dropdown::prelude::*;
//!
//! let doc = Document::new();
//! let input = doc.create_element("input");
//! doc.set_element_id(input, "search").unwrap();
//! doc.append_child(doc.body(), input).unwrap();
//!
//! let config = DropdownConfig::new("#search", DataAliases::full("img", "text1", "text2"))
//!     .with_keywalk(true)
//!     .on_select(|event| println!("selected item {}", event.index));
//! let dropdown = InputDropdown::new(&doc, config).unwrap();
//!
//! dropdown
//!     .update_data(vec![
//!         record([("img", "a.png"), ("text1", "Alice"), ("text2", "Admin")]),
//!         record([("img", "b.png"), ("text1", "Bob"), ("text2", "User")]),
//!     ])
//!     .unwrap();
//! assert_eq!(dropdown.items().len(), 2);
//!
//! doc.type_text(input, "a").unwrap();
//! assert_eq!(dropdown.visibility(), Visibility::Visible);
//!
//! doc.type_text(input, "").unwrap();
//! assert_eq!(dropdown.visibility(), Visibility::Hidden);
//! ```

mod aliases;
mod config;
pub mod constants;
mod error;
mod events;
mod keywalk;
mod markup;
mod position;
pub mod record;
mod render;
mod stylesheet;
mod subscriptions;
mod visibility;
mod widget;

pub use aliases::{DataAliases, Slot};
pub use config::DropdownConfig;
pub use error::{Error, Result};
pub use events::{ItemCallback, ItemEvent};
pub use keywalk::{Keywalk, NavigationCallback, Navigator, NavigatorFactory, NavigatorParams};
pub use markup::{MarkupMode, escape_css_string};
pub use position::{DropdownPlacement, InputGeometry, PositionTracking};
pub use record::Record;
pub use render::render_items;
pub use stylesheet::{DEFAULT_CSS, default_engine, stylesheet};
pub use subscriptions::Subscriptions;
pub use visibility::{Trigger, Visibility};
pub use widget::{InputDropdown, generate_instance_class};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::record::record;
    pub use crate::{
        DataAliases, DropdownConfig, InputDropdown, ItemEvent, MarkupMode, Navigator, NavigatorParams, Record,
        Visibility,
    };
    pub use input_dropdown_core::{Document, EventKind, Key, MutationSupport, Rect};
}
