//! Ordered trace of recorded geographic points.
//!
//! A trace is an open sequence of samples (a path, not a closed shape).
//! Each sample couples a 4-component position vector with an opaque capture
//! timestamp. The trace owns its samples exclusively; content is read and
//! replaced wholesale, never edited element by element.

use std::fmt;
use std::io::{Read, Write};

use crate::core::{AnswerTag, AnswerValue, ExprValue, Uncast, Value};
use crate::geo::GeoPoint;
use crate::stream;
use crate::util::{Error, Result};

/// One recorded sample: position vector plus capture timestamp.
///
/// The vector always holds exactly four components in fixed order
/// (latitude, longitude, altitude, accuracy), zero-filled when unknown.
/// The timestamp is an opaque caller-owned string; its shape is never
/// validated here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointRecord {
    coords: [f64; 4],
    timestamp: Option<String>,
}

impl PointRecord {
    /// Create a record from a full component vector and timestamp.
    pub fn new(coords: [f64; 4], timestamp: Option<String>) -> Self {
        Self { coords, timestamp }
    }

    /// The component vector: latitude, longitude, altitude, accuracy.
    #[inline]
    pub fn coords(&self) -> [f64; 4] {
        self.coords
    }

    /// The capture timestamp, if one was recorded.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

/// Ordered, open sequence of recorded geographic points.
///
/// An empty trace is a valid "no data yet" state. Order is significant and
/// duplicate samples are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTrace {
    points: Vec<PointRecord>,
}

impl GeoTrace {
    /// Rendering of a sample whose timestamp is absent.
    pub const ABSENT_TIMESTAMP_TEXT: &'static str = "null";

    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trace from an owned sequence of records.
    pub fn from_points(points: Vec<PointRecord>) -> Self {
        Self { points }
    }

    /// The recorded samples, in capture order.
    #[inline]
    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    /// Number of recorded samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no samples have been recorded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Canonical text rendering, one `<point> <timestamp>` group per
    /// sample, groups joined by `"; "`. An empty trace renders as `""`.
    pub fn display_text(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            out.push_str(&GeoPoint::from_coords(p.coords()).display_text());
            out.push(' ');
            out.push_str(p.timestamp().unwrap_or(Self::ABSENT_TIMESTAMP_TEXT));
        }
        out
    }

    /// Parse trace text produced by [`display_text`](Self::display_text).
    ///
    /// The semicolon split contributes only the segment count; every
    /// record is built from the full input's leading tokens. The
    /// normalized whole string goes to the point parser and the timestamp
    /// is the fifth space-separated token, verbatim. Multi-segment text
    /// therefore yields that many copies of one point; only single-point
    /// text round-trips.
    pub fn parse(text: &str) -> Result<Self> {
        let segments = text.split(';').count();

        let tokens: Vec<&str> = text.trim().split(' ').collect();
        let normalized = tokens.iter().map(|t| t.trim()).collect::<Vec<_>>().join(" ");

        let point = GeoPoint::parse(&normalized)?;
        let timestamp = tokens.get(4).copied().ok_or(Error::TooFewTokens {
            expected: 5,
            got: tokens.len(),
        })?;

        let record = PointRecord::new(point.coords(), Some(timestamp.to_string()));
        Ok(Self { points: vec![record; segments] })
    }

    fn write_points(&self, out: &mut dyn Write) -> Result<()> {
        stream::write_count(out, self.points.len())?;
        for p in &self.points {
            GeoPoint::from_coords(p.coords()).encode(out)?;
            stream::write_opt_string(out, p.timestamp())?;
        }
        Ok(())
    }

    fn read_points(input: &mut dyn Read) -> Result<Vec<PointRecord>> {
        let count = stream::read_count(input)?;
        let mut points = Vec::new();
        for _ in 0..count {
            let point = GeoPoint::decode(input)?;
            let timestamp = stream::read_opt_string(input)?;
            points.push(PointRecord::new(point.coords(), timestamp));
        }
        tracing::trace!(points = count, "decoded trace");
        Ok(points)
    }
}

impl fmt::Display for GeoTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl AnswerValue for GeoTrace {
    fn tag(&self) -> AnswerTag {
        AnswerTag::Trace
    }

    fn clone_value(&self) -> Box<dyn ExprValue> {
        Box::new(self.clone())
    }

    fn display_text(&self) -> String {
        GeoTrace::display_text(self)
    }

    fn value(&self) -> Value {
        Value::Trace(self.clone())
    }

    fn set_value(&mut self, value: Option<Value>) -> Result<()> {
        match value.ok_or(Error::NullValue)? {
            Value::Trace(t) => {
                self.points = t.points;
            }
            other => {
                self.points = Self::parse(&other.display_text())?.points;
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
        self.write_points(out)
    }

    fn deserialize(&mut self, input: &mut dyn Read) -> Result<()> {
        self.points = Self::read_points(input)?;
        Ok(())
    }
}

impl ExprValue for GeoTrace {
    fn to_boolean(&self) -> bool {
        !self.points.is_empty()
    }

    /// Worst (largest) accuracy reading across all samples.
    ///
    /// The running maximum starts at zero, so a lone negative reading
    /// reports 0.0 rather than its own value.
    fn to_numeric(&self) -> f64 {
        if self.points.is_empty() {
            return GeoPoint::NO_ACCURACY_VALUE;
        }
        let mut worst = 0.0f64;
        for p in &self.points {
            worst = worst.max(GeoPoint::from_coords(p.coords()).accuracy());
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(coords: [f64; 4], ts: &str) -> PointRecord {
        PointRecord::new(coords, Some(ts.to_string()))
    }

    #[test]
    fn test_empty_trace_renders_empty() {
        let t = GeoTrace::new();
        assert_eq!(t.display_text(), "");
        assert_eq!(t.to_string(), "");
    }

    #[test]
    fn test_display_joins_points() {
        let t = GeoTrace::from_points(vec![
            record([1.0, 2.0, 3.0, 4.0], "t0"),
            record([5.0, 6.0, 7.0, 8.0], "t1"),
        ]);
        assert_eq!(t.display_text(), "1 2 3 4 t0; 5 6 7 8 t1");
    }

    #[test]
    fn test_display_absent_timestamp_marker() {
        let t = GeoTrace::from_points(vec![PointRecord::new([1.0, 2.0, 3.0, 4.0], None)]);
        assert_eq!(t.display_text(), "1 2 3 4 null");
    }

    #[test]
    fn test_single_point_text_roundtrip() {
        let t = GeoTrace::from_points(vec![record([47.5, 8.25, 410.0, 3.5], "2014-06-01T12:00:00Z")]);
        let back = GeoTrace::parse(&t.display_text()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_parse_normalizes_surrounding_whitespace() {
        let t = GeoTrace::parse("  1 2 3 4 ts  ").unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.points()[0].coords(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.points()[0].timestamp(), Some("ts"));
    }

    #[test]
    fn test_multi_segment_text_duplicates_first_point() {
        let t = GeoTrace::parse("1 2 3 4 ts; 5 6 7 8 ts2").unwrap();
        assert_eq!(t.len(), 2);
        // Both records come from the full input's leading tokens.
        for p in t.points() {
            assert_eq!(p.coords(), [1.0, 2.0, 3.0, 4.0]);
            assert_eq!(p.timestamp(), Some("ts;"));
        }
    }

    #[test]
    fn test_parse_too_few_tokens() {
        let err = GeoTrace::parse("1 2 3 4").unwrap_err();
        assert!(matches!(err, Error::TooFewTokens { expected: 5, got: 4 }));
    }

    #[test]
    fn test_parse_empty_text_fails() {
        assert!(GeoTrace::parse("").is_err());
    }

    #[test]
    fn test_parse_bad_point_text_fails() {
        let err = GeoTrace::parse("1 x 3 4 ts").unwrap_err();
        assert!(matches!(err, Error::InvalidPoint(_)));
    }

    #[test]
    fn test_binary_roundtrip() {
        for t in [
            GeoTrace::new(),
            GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")]),
            GeoTrace::from_points(vec![
                record([1.0, 2.0, 3.0, 4.0], "t0"),
                PointRecord::new([-10.0, 20.0, 0.0, 12.5], None),
                record([1.0, 2.0, 3.0, 4.0], "t0"),
            ]),
        ] {
            let mut buf = Vec::new();
            t.serialize(&mut buf).unwrap();

            let mut back = GeoTrace::new();
            back.deserialize(&mut buf.as_slice()).unwrap();
            assert_eq!(back, t);
        }
    }

    #[test]
    fn test_truncated_binary_leaves_receiver_unchanged() {
        let t = GeoTrace::from_points(vec![
            record([1.0, 2.0, 3.0, 4.0], "t0"),
            record([5.0, 6.0, 7.0, 8.0], "t1"),
        ]);
        let mut buf = Vec::new();
        t.serialize(&mut buf).unwrap();
        // Drop the tail of the final timestamp.
        buf.truncate(buf.len() - 1);

        let prior = GeoTrace::from_points(vec![record([9.0, 9.0, 9.0, 9.0], "keep")]);
        let mut target = prior.clone();
        let err = target.deserialize(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof(_)));
        assert_eq!(target, prior);
    }

    #[test]
    fn test_decode_replaces_prior_content() {
        let mut buf = Vec::new();
        GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")])
            .serialize(&mut buf)
            .unwrap();

        let mut target = GeoTrace::from_points(vec![record([9.0, 9.0, 9.0, 9.0], "old")]);
        target.deserialize(&mut buf.as_slice()).unwrap();
        assert_eq!(target.len(), 1);
        assert_eq!(target.points()[0].timestamp(), Some("t0"));
    }

    #[test]
    fn test_to_boolean() {
        assert!(!GeoTrace::new().to_boolean());
        let t = GeoTrace::from_points(vec![record([0.0, 0.0, 0.0, 0.0], "ts")]);
        assert!(t.to_boolean());
    }

    #[test]
    fn test_to_numeric_empty_is_sentinel() {
        assert_eq!(GeoTrace::new().to_numeric(), GeoPoint::NO_ACCURACY_VALUE);
    }

    #[test]
    fn test_to_numeric_worst_accuracy() {
        let t = GeoTrace::from_points(vec![
            record([0.0, 0.0, 0.0, 3.0], "a"),
            record([0.0, 0.0, 0.0, 7.5], "b"),
            record([0.0, 0.0, 0.0, 1.2], "c"),
        ]);
        assert_eq!(t.to_numeric(), 7.5);
    }

    #[test]
    fn test_to_numeric_floors_negative_accuracy_at_zero() {
        let t = GeoTrace::from_points(vec![record([0.0, 0.0, 0.0, -4.0], "a")]);
        assert_eq!(t.to_numeric(), 0.0);
    }

    #[test]
    fn test_set_value_replaces_wholesale() {
        let mut t = GeoTrace::from_points(vec![record([9.0, 9.0, 9.0, 9.0], "old")]);
        let next = GeoTrace::from_points(vec![
            record([1.0, 2.0, 3.0, 4.0], "t0"),
            record([5.0, 6.0, 7.0, 8.0], "t1"),
        ]);
        t.set_value(Some(Value::Trace(next.clone()))).unwrap();
        assert_eq!(t, next);
    }

    #[test]
    fn test_set_value_coerces_text() {
        let mut t = GeoTrace::new();
        t.set_value(Some(Value::Text("1 2 3 4 ts".to_string()))).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.points()[0].timestamp(), Some("ts"));
    }

    #[test]
    fn test_set_value_null_refused_and_unchanged() {
        let prior = GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")]);
        let mut t = prior.clone();
        assert!(matches!(t.set_value(None).unwrap_err(), Error::NullValue));
        assert_eq!(t, prior);
    }

    #[test]
    fn test_set_value_bad_text_leaves_content() {
        let prior = GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")]);
        let mut t = prior.clone();
        assert!(t.set_value(Some(Value::Text("not a trace".to_string()))).is_err());
        assert_eq!(t, prior);
    }

    #[test]
    fn test_value_is_deep_copy() {
        let t = GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")]);
        let mut copy = match t.value() {
            Value::Trace(c) => c,
            other => panic!("unexpected exchange value: {other:?}"),
        };
        // Mutating the copy must not touch the source.
        copy.set_value(Some(Value::Trace(GeoTrace::new()))).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_clone_value_independence() {
        let t = GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")]);
        let mut cloned = t.clone_value();
        cloned.set_value(Some(Value::Trace(GeoTrace::new()))).unwrap();
        assert_eq!(t.len(), 1);
        assert!(!cloned.to_boolean());
    }

    #[test]
    fn test_uncast_matches_display() {
        let t = GeoTrace::from_points(vec![record([1.0, 2.0, 3.0, 4.0], "t0")]);
        assert_eq!(t.uncast().value, t.display_text());
    }

    #[test]
    fn test_cast_from_uncast() {
        let t = GeoTrace::new();
        let cast = t.cast(&Uncast::new("1 2 3 4 ts")).unwrap();
        assert_eq!(cast.display_text(), "1 2 3 4 ts");
        assert_eq!(cast.tag(), AnswerTag::Trace);
    }
}
