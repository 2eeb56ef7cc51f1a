//! In-memory document tree.

use std::fmt;

use crate::types::PackedDtype;

/// A scalar leaf value.
///
/// Integers that fit a signed 64-bit value parse as [`Int`](Self::Int);
/// larger unsigned values parse as [`Uint`](Self::Uint) so that legal
/// documents still round-trip. Packing a `Uint` fails with the range error
/// rather than truncating.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer above `i64::MAX`
    Uint(u64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Uint(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Uint(v),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered key/value pairs. Keys are unique scalars; duplicates are
    /// rejected at the parse boundary. Insertion order is preserved and
    /// significant.
    Mapping(Vec<(Scalar, Node)>),
    /// A literal sequence of nodes
    Sequence(Vec<Node>),
    /// A scalar leaf
    Scalar(Scalar),
    /// A numeric sequence re-encoded as a binary payload
    Packed(PackedArray),
}

impl Node {
    /// Short name of the node's shape, for error messages
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
            Self::Scalar(_) => "scalar",
            Self::Packed(_) => "packed array",
        }
    }
}

/// A numeric sequence re-encoded as a fixed-width little-endian payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedArray {
    /// Element dtype stored in the payload
    pub dtype: PackedDtype,
    /// Number of encoded elements
    pub len: usize,
    /// Exactly `len * dtype.size_bytes()` little-endian bytes
    pub payload: Vec<u8>,
}

impl PackedArray {
    /// Payload length implied by `len` and `dtype`, or `None` if the
    /// multiplication overflows (a hostile length field).
    #[must_use]
    pub fn expected_payload_len(&self) -> Option<usize> {
        self.len.checked_mul(self.dtype.size_bytes())
    }
}
