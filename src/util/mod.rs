//! Utility types for the geotrace library.
//!
//! - [`Error`] / [`Result`] - Error handling

mod error;

pub use error::*;
