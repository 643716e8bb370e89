//! The bundled default stylesheet.

use input_dropdown_style::prelude::{StyleEngine, StylePriority, StyleSheet};

use crate::Result;

/// Default appearance of the container and item classes.
///
/// The container is hidden until the widget sets an inline `display`.
/// Consumers override these rules with a higher-priority sheet or through
/// the configured extra class.
pub const DEFAULT_CSS: &str = r#"
.inpd-dropdown-container {
    display: none;
    position: absolute;
    z-index: 1000;
    box-sizing: border-box;
    max-height: 320px;
    overflow-y: auto;
    background-color: #ffffff;
    border: 1px solid #d0d0d0;
    border-radius: 4px;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.12);
}

.inpd-dropdown-item {
    display: flex;
    align-items: center;
    padding: 8px 12px;
    cursor: pointer;
}

.inpd-dropdown-item + .inpd-dropdown-item {
    border-top: 1px solid #f0f0f0;
}

.inpd-dropdown-item-active {
    background-color: #e8f0fe;
}

.inpd-dropdown-item-icon {
    width: 32px;
    height: 32px;
    margin-right: 12px;
    flex-shrink: 0;
    border-radius: 50%;
    background-size: cover;
    background-position: center;
}

.inpd-dropdown-item-title {
    font-weight: 600;
}

.inpd-dropdown-item-subtitle {
    font-size: 0.85em;
    color: #666666;
}
"#;

/// Parse the bundled stylesheet at widget priority.
pub fn stylesheet() -> Result<StyleSheet> {
    Ok(StyleSheet::from_css(DEFAULT_CSS, StylePriority::Widget)?)
}

/// A style engine holding the bundled stylesheet.
pub fn default_engine() -> Result<StyleEngine> {
    let mut engine = StyleEngine::new();
    engine.add_stylesheet(stylesheet()?);
    Ok(engine)
}
