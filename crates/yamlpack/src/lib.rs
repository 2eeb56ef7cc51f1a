//! # yamlpack
//!
//! Selective compression for YAML documents dominated by large numeric
//! arrays. Long homogeneous sequences of integers or floats are re-encoded
//! as fixed-width little-endian payloads carried in a `!packed/v1` block;
//! everything else in the document (mappings, key order, short sequences,
//! strings) passes through untouched. Decompression restores an equivalent
//! document, exactly for integers and 64-bit floats, rounded once for
//! narrower float widths.
//!
//! ## Quick start
//!
//! ```
//! use yamlpack::{CompressionConfig, Node, Scalar};
//! use yamlpack::transform::{compress_tree, decompress_tree};
//!
//! let doc = Node::Sequence(
//!     (0..100)
//!         .map(|i| Node::Scalar(Scalar::Float(f64::from(i) * 0.5)))
//!         .collect(),
//! );
//!
//! let packed = compress_tree(&doc, &CompressionConfig::lossless())?;
//! assert!(matches!(packed, Node::Packed(_)));
//! assert_eq!(decompress_tree(&packed)?, doc);
//! # Ok::<(), yamlpack::YamlpackError>(())
//! ```
//!
//! File-to-file entry points live in [`pipeline`]:
//! [`compress_document`] and [`decompress_document`].
//!
//! ## Modules
//!
//! - [`classify`]: decides which sequences are worth packing
//! - [`codec`]: binary encode/decode and float narrowing
//! - [`transform`]: whole-tree compress/decompress
//! - [`document`]: YAML parsing, emission, and the `!packed/v1` block
//! - [`pipeline`]: configuration, entry points, statistics, inspection

pub mod classify;
pub mod codec;
pub mod document;
pub mod pipeline;
pub mod transform;

pub use classify::{classify, Classification};
pub use codec::{decode_array, encode_array, PrecisionStats};
pub use document::{load_document, save_document, PACKED_TAG};
pub use pipeline::{
    compress_document, decompress_document, inspect_document, CompressionConfig,
    CompressionStats, DecompressionStats, DocumentCompressor, DocumentReport, PackedArrayInfo,
};
pub use transform::{compress_tree, decompress_tree};

pub use yamlpack_core::{
    ElementKind, FloatDtype, Node, PackedArray, PackedDtype, Result, Scalar, YamlpackError,
};
