//! Single geographic point: the component every trace record delegates to
//! for formatting, casting, and accuracy readings.

use std::fmt;
use std::io::{Read, Write};

use crate::core::{AnswerTag, AnswerValue, ExprValue, Uncast, Value};
use crate::stream;
use crate::util::{Error, Result};

/// One recorded geographic fix.
///
/// Carries up to four components in fixed order: latitude, longitude,
/// altitude, accuracy. Latitude and longitude are mandatory; missing
/// trailing components are zero-filled in storage, and `provided` records
/// how many the source actually supplied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    coords: [f64; 4],
    provided: usize,
}

impl GeoPoint {
    /// Accuracy reading reported when a point carries no accuracy
    /// component.
    pub const NO_ACCURACY_VALUE: f64 = 9_999_999.0;

    /// Maximum number of components in a point.
    pub const MAX_COMPONENTS: usize = 4;

    /// Minimum number of components in a point (latitude, longitude).
    pub const MIN_COMPONENTS: usize = 2;

    /// Create a point at the origin with only latitude and longitude set.
    pub fn new() -> Self {
        Self { coords: [0.0; 4], provided: Self::MIN_COMPONENTS }
    }

    /// Create a point from a full 4-component vector.
    pub fn from_coords(coords: [f64; 4]) -> Self {
        Self { coords, provided: Self::MAX_COMPONENTS }
    }

    /// The full component vector, missing components zero-filled.
    #[inline]
    pub fn coords(&self) -> [f64; 4] {
        self.coords
    }

    /// Number of components the source supplied (2..=4).
    #[inline]
    pub fn num_components(&self) -> usize {
        self.provided
    }

    /// Latitude in decimal degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.coords[0]
    }

    /// Longitude in decimal degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.coords[1]
    }

    /// Altitude in meters.
    #[inline]
    pub fn altitude(&self) -> f64 {
        self.coords[2]
    }

    /// Accuracy reading in meters.
    ///
    /// [`NO_ACCURACY_VALUE`](Self::NO_ACCURACY_VALUE) when the point was
    /// supplied without an accuracy component.
    pub fn accuracy(&self) -> f64 {
        if self.provided == Self::MAX_COMPONENTS {
            self.coords[3]
        } else {
            Self::NO_ACCURACY_VALUE
        }
    }

    /// Display text: the supplied components, space-separated.
    pub fn display_text(&self) -> String {
        let mut out = String::new();
        for (i, c) in self.coords.iter().take(self.provided).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&c.to_string());
        }
        out
    }

    /// Parse point text: space-separated numeric components.
    ///
    /// Reads the first four space-separated tokens; anything after them is
    /// ignored, so text carrying trailing annotations still casts. Missing
    /// altitude/accuracy are zero-filled. Latitude must lie in [-90, 90]
    /// and longitude in [-180, 180].
    pub fn parse(text: &str) -> Result<Self> {
        let tokens: Vec<&str> = text.split(' ').collect();
        let provided = tokens.len().min(Self::MAX_COMPONENTS);
        if provided < Self::MIN_COMPONENTS {
            return Err(Error::invalid_point(format!(
                "need at least latitude and longitude, got {text:?}"
            )));
        }

        let mut coords = [0.0; 4];
        for (i, token) in tokens.iter().take(provided).enumerate() {
            coords[i] = token.parse::<f64>().map_err(|_| {
                Error::invalid_point(format!("component {i} is not a number: {token:?}"))
            })?;
        }

        if !(-90.0..=90.0).contains(&coords[0]) {
            return Err(Error::OutOfRange { axis: "latitude", value: coords[0] });
        }
        if !(-180.0..=180.0).contains(&coords[1]) {
            return Err(Error::OutOfRange { axis: "longitude", value: coords[1] });
        }

        Ok(Self { coords, provided })
    }

    /// Binary-encode: component count byte, then that many f64 values.
    pub fn encode(&self, out: &mut dyn Write) -> Result<()> {
        stream::write_u8(out, self.provided as u8)?;
        for c in self.coords.iter().take(self.provided) {
            stream::write_f64(out, *c)?;
        }
        Ok(())
    }

    /// Binary-decode a point written by [`encode`](Self::encode).
    pub fn decode(input: &mut dyn Read) -> Result<Self> {
        let provided = stream::read_u8(input, "point component count")? as usize;
        if !(Self::MIN_COMPONENTS..=Self::MAX_COMPONENTS).contains(&provided) {
            return Err(Error::invalid_stream(format!(
                "point component count out of range: {provided}"
            )));
        }
        let mut coords = [0.0; 4];
        for c in coords.iter_mut().take(provided) {
            *c = stream::read_f64(input)?;
        }
        Ok(Self { coords, provided })
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl AnswerValue for GeoPoint {
    fn tag(&self) -> AnswerTag {
        AnswerTag::Point
    }

    fn clone_value(&self) -> Box<dyn ExprValue> {
        Box::new(self.clone())
    }

    fn display_text(&self) -> String {
        GeoPoint::display_text(self)
    }

    fn value(&self) -> Value {
        Value::Point(self.clone())
    }

    fn set_value(&mut self, value: Option<Value>) -> Result<()> {
        match value.ok_or(Error::NullValue)? {
            Value::Point(p) => {
                *self = p;
            }
            other => {
                *self = Self::parse(&other.display_text())?;
            }
        }
        Ok(())
    }

    fn uncast(&self) -> Uncast {
        Uncast::new(self.display_text())
    }

    fn cast(&self, raw: &Uncast) -> Result<Box<dyn ExprValue>> {
        Ok(Box::new(Self::parse(&raw.value)?))
    }

    fn serialize(&self, out: &mut dyn Write) -> Result<()> {
        self.encode(out)
    }

    fn deserialize(&mut self, input: &mut dyn Read) -> Result<()> {
        *self = Self::decode(input)?;
        Ok(())
    }
}

impl ExprValue for GeoPoint {
    fn to_boolean(&self) -> bool {
        // A stored point is always a fix.
        true
    }

    fn to_numeric(&self) -> f64 {
        self.accuracy()
    }
}
