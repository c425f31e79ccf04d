//! Error types for the geotrace library.

use thiserror::Error;

/// Main error type for answer-value operations.
#[derive(Error, Debug)]
pub enum Error {
    /// `set_value` was handed no value at all
    #[error("Cannot set an answer value from nothing")]
    NullValue,

    /// Binary input ended before the announced content
    #[error("Unexpected end of stream while reading {0}")]
    UnexpectedEof(&'static str),

    /// Length prefix or payload that cannot be honored
    #[error("Invalid stream data: {0}")]
    InvalidStream(String),

    /// Tag byte that names no known answer kind
    #[error("Unknown answer tag: {0}")]
    UnknownTag(u8),

    /// Text that does not describe a geographic point
    #[error("Invalid point text: {0}")]
    InvalidPoint(String),

    /// Text too short to carry a point and its timestamp
    #[error("Expected at least {expected} tokens, got {got}")]
    TooFewTokens { expected: usize, got: usize },

    /// Latitude or longitude outside its legal range
    #[error("Coordinate out of range: {axis} = {value}")]
    OutOfRange { axis: &'static str, value: f64 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create an invalid-stream error.
    pub fn invalid_stream(msg: impl Into<String>) -> Self {
        Self::InvalidStream(msg.into())
    }

    /// Create an invalid-point error.
    pub fn invalid_point(msg: impl Into<String>) -> Self {
        Self::InvalidPoint(msg.into())
    }
}

/// Result type alias for answer-value operations.
pub type Result<T> = std::result::Result<T, Error>;
