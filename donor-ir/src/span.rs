#![forbid(unsafe_code)]

use miette::SourceSpan;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type Span = SourceSpan;

pub fn span(start: usize, len: usize) -> Span {
    SourceSpan::new(start.into(), len)
}

/// Span for IR built in memory, with no source text behind it.
pub fn detached() -> Span {
    span(0, 0)
}

/// Serialized form of a [`Span`]: `{ "offset": .., "len": .. }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRange {
    pub offset: usize,
    pub len: usize,
}

impl From<Span> for SpanRange {
    fn from(s: Span) -> Self {
        Self {
            offset: s.offset(),
            len: s.len(),
        }
    }
}

impl From<SpanRange> for Span {
    fn from(r: SpanRange) -> Self {
        span(r.offset, r.len)
    }
}

/// `#[serde(with = "span_serde")]` adapter for `Span` fields.
pub mod span_serde {
    use super::*;

    pub fn serialize<S: Serializer>(s: &Span, ser: S) -> Result<S::Ok, S::Error> {
        SpanRange::from(*s).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Span, D::Error> {
        SpanRange::deserialize(de).map(Span::from)
    }
}
