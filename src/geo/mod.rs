//! Concrete geographic answer kinds.
//!
//! - [`GeoPoint`] - single recorded fix; also the component every trace
//!   record delegates to for formatting, casting, and accuracy readings
//! - [`GeoTrace`] / [`PointRecord`] - ordered open sequence of fixes

mod point;
mod trace;

pub use point::GeoPoint;
pub use trace::{GeoTrace, PointRecord};
