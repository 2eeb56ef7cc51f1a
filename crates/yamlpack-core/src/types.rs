//! Data type descriptors for packed arrays.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical kind of the elements in a numeric sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Int,
    Float,
}

impl ElementKind {
    /// Name used in the persisted `kind` field
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
        }
    }

    /// Parse a persisted `kind` field
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target float width for packing float sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatDtype {
    Float16,
    Float32,
    Float64,
}

impl FloatDtype {
    /// Size in bytes of a single packed element
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        match self {
            Self::Float16 => 2,
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Width in bits of a single packed element
    #[must_use]
    pub const fn width_bits(&self) -> u32 {
        match self {
            Self::Float16 => 16,
            Self::Float32 => 32,
            Self::Float64 => 64,
        }
    }

    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl fmt::Display for FloatDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dtype of a packed payload: the element kind united with its stored width.
///
/// Integer sequences always pack at 64 bits; float sequences pack at the
/// width chosen in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackedDtype {
    Int64,
    Float16,
    Float32,
    Float64,
}

impl PackedDtype {
    /// Size in bytes of a single element
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        match self {
            Self::Float16 => 2,
            Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Width in bits of a single element
    #[must_use]
    pub const fn width_bits(&self) -> u32 {
        match self {
            Self::Float16 => 16,
            Self::Float32 => 32,
            Self::Int64 | Self::Float64 => 64,
        }
    }

    /// Logical element kind
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Int64 => ElementKind::Int,
            Self::Float16 | Self::Float32 | Self::Float64 => ElementKind::Float,
        }
    }

    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Reassemble a dtype from its persisted kind and width fields.
    ///
    /// Returns `None` for combinations the format does not define, such as
    /// 16-bit integers.
    #[must_use]
    pub const fn from_parts(kind: ElementKind, width_bits: u32) -> Option<Self> {
        match (kind, width_bits) {
            (ElementKind::Int, 64) => Some(Self::Int64),
            (ElementKind::Float, 16) => Some(Self::Float16),
            (ElementKind::Float, 32) => Some(Self::Float32),
            (ElementKind::Float, 64) => Some(Self::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for PackedDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FloatDtype> for PackedDtype {
    fn from(dtype: FloatDtype) -> Self {
        match dtype {
            FloatDtype::Float16 => Self::Float16,
            FloatDtype::Float32 => Self::Float32,
            FloatDtype::Float64 => Self::Float64,
        }
    }
}
