//! Answer-kind registry: wire tags and the tagged envelope codec.
//!
//! Persisted answers are reconstructed from an explicit tag byte dispatched
//! at compile time; there is no by-name instantiation.

use std::fmt;
use std::io::{Read, Write};

use crate::core::{AnswerValue, ExprValue};
use crate::geo::{GeoPoint, GeoTrace};
use crate::stream;
use crate::util::{Error, Result};

/// Wire tag identifying an answer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AnswerTag {
    /// Single geographic point.
    Point = 1,
    /// Ordered trace of geographic points.
    Trace = 2,
}

impl AnswerTag {
    /// Tag byte as written to a stream.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a tag byte. Returns `None` for unassigned bytes.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Point),
            2 => Some(Self::Trace),
            _ => None,
        }
    }

    /// Stable name of this kind.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "geopoint",
            Self::Trace => "geotrace",
        }
    }
}

impl fmt::Display for AnswerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construct an empty answer of the tagged kind.
pub fn empty_answer(tag: AnswerTag) -> Box<dyn ExprValue> {
    match tag {
        AnswerTag::Point => Box::new(GeoPoint::new()),
        AnswerTag::Trace => Box::new(GeoTrace::new()),
    }
}

/// Write a tagged answer envelope: tag byte, then the kind's encoding.
pub fn write_answer(out: &mut dyn Write, value: &dyn AnswerValue) -> Result<()> {
    tracing::trace!(tag = value.tag().name(), "encoding answer envelope");
    stream::write_u8(out, value.tag().as_u8())?;
    value.serialize(out)
}

/// Read a tagged answer envelope written by [`write_answer`].
pub fn read_answer(input: &mut dyn Read) -> Result<Box<dyn ExprValue>> {
    let byte = stream::read_u8(input, "answer tag")?;
    let tag = AnswerTag::from_u8(byte).ok_or(Error::UnknownTag(byte))?;
    tracing::trace!(tag = tag.name(), "decoding answer envelope");
    let mut value = empty_answer(tag);
    value.deserialize(input)?;
    Ok(value)
}
