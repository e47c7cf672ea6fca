//! Error types for the scan_palette library

use thiserror::Error;

use crate::session::Notice;

/// Result type alias for scan_palette operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Error conditions raised by parsing, extraction and collection operations.
///
/// Every variant is recoverable: the caller's session stays in the state it
/// had before the failing call.
#[derive(Error, Debug)]
pub enum PaletteError {
    /// Text could not be normalized into a valid color
    #[error("Invalid color: {input}")]
    InvalidColorInput { input: String },

    /// Candidate color is already present in the collection
    #[error("Color already exists: {color}")]
    DuplicateColor { color: String },

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {message}")]
    ImageDecodeFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Palette extraction could not produce a result
    #[error("Palette extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Collection index does not name an entry
    #[error("Index {index} out of range for collection of {len} colors")]
    IndexOutOfRange { index: usize, len: usize },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PaletteError {
    /// Create an invalid color error for the given raw input
    pub fn invalid_color(input: impl Into<String>) -> Self {
        Self::InvalidColorInput {
            input: input.into(),
        }
    }

    /// Create an image decode error with context
    pub fn image_decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageDecodeFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Configuration errors are the only ones that need operator action.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PaletteError::ConfigError { .. })
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            PaletteError::InvalidColorInput { input } => {
                format!("\"{input}\" is not a valid color. Please enter a valid color code.")
            }
            PaletteError::DuplicateColor { .. } => {
                "This color is already in your list.".to_string()
            }
            PaletteError::ImageDecodeFailure { .. } => {
                "Could not load the image. Please try a different image.".to_string()
            }
            PaletteError::ExtractionFailed { .. } => {
                "Error extracting colors. Please try a different image.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Map this error onto the notice a UI layer should surface, if any
    pub fn notice(&self) -> Option<Notice> {
        match self {
            PaletteError::InvalidColorInput { input } => Some(Notice::InvalidColor {
                input: input.clone(),
            }),
            PaletteError::DuplicateColor { color } => Some(Notice::DuplicateColor {
                color: color.clone(),
            }),
            PaletteError::ImageDecodeFailure { .. } | PaletteError::ExtractionFailed { .. } => {
                Some(Notice::ExtractionFailed {
                    message: self.user_message(),
                })
            }
            _ => None,
        }
    }
}
