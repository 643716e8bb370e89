//! Error types for the dropdown widget.

use std::path::PathBuf;

use input_dropdown_core::DomError;

/// Result type alias for dropdown operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving a dropdown.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input selector matched no element.
    #[error("No element matches selector '{0}'")]
    SelectorNotFound(String),

    /// A selector or stylesheet could not be parsed.
    #[error(transparent)]
    Style(#[from] input_dropdown_style::Error),

    /// A document operation failed.
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    /// The configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A JSON configuration could not be decoded.
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML configuration could not be decoded.
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dropdown was destroyed.
    #[error("The dropdown has been destroyed")]
    Destroyed,
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
