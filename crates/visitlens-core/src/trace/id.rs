//! Span identities.

use std::fmt;

use rand::Rng;
use serde::{Serialize, Serializer};

/// 128-bit trace id, rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(u128);

/// 64-bit span id, rendered as 16 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(u64);

impl TraceId {
    pub const fn from_u128(v: u128) -> Self {
        Self(v)
    }

    pub const fn to_u128(self) -> u128 {
        self.0
    }

    /// Random non-zero id.
    pub fn random() -> Self {
        Self(rand::thread_rng().gen_range(1..=u128::MAX))
    }
}

impl SpanId {
    pub const fn from_u64(v: u64) -> Self {
        Self(v)
    }

    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// Random non-zero id.
    pub fn random() -> Self {
        Self(rand::thread_rng().gen_range(1..=u64::MAX))
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for TraceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for SpanId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identity of one span. Flat: there is no parent linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpanIdentity {
    pub trace_id: TraceId,
    pub span_id: SpanId,
}

impl SpanIdentity {
    /// Fresh random identity.
    pub fn generate() -> Self {
        Self {
            trace_id: TraceId::random(),
            span_id: SpanId::random(),
        }
    }
}
