//! # yamlpack-core
//!
//! Core types shared across yamlpack crates: the in-memory document tree,
//! packed-array dtype descriptors, and the error type.
//!
//! The document model is deliberately small: a [`Node`] is a mapping (ordered
//! key/value pairs), a sequence, a scalar, or a [`PackedArray`] holding a
//! numeric payload re-encoded at a fixed width. Everything that touches the
//! YAML text itself lives in the `yamlpack` crate.

pub mod error;
pub mod node;
pub mod types;

pub use error::{Result, YamlpackError};
pub use node::{Node, PackedArray, Scalar};
pub use types::{ElementKind, FloatDtype, PackedDtype};
