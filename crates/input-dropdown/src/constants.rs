//! CSS class names emitted by the dropdown.

/// Class carried by every dropdown container.
pub const CONTAINER_CLASS: &str = "inpd-dropdown-container";

/// Class carried by every rendered item.
pub const ITEM_CLASS: &str = "inpd-dropdown-item";

/// Class of the icon block inside an item.
pub const ITEM_ICON_CLASS: &str = "inpd-dropdown-item-icon";

/// Class of the title block inside an item.
pub const ITEM_TITLE_CLASS: &str = "inpd-dropdown-item-title";

/// Class of the subtitle block inside an item.
pub const ITEM_SUBTITLE_CLASS: &str = "inpd-dropdown-item-subtitle";

/// Class of the item under the keyboard cursor.
pub const ITEM_ACTIVE_CLASS: &str = "inpd-dropdown-item-active";

/// Number of random characters in a generated instance class.
pub const INSTANCE_SUFFIX_LEN: usize = 5;

/// How many times instance class generation retries on a collision.
pub const INSTANCE_CLASS_ATTEMPTS: usize = 16;
