//! Whole-document compression and decompression transforms.

use yamlpack_core::{Node, Result};

use crate::classify::{classify, Classification};
use crate::codec::{decode_array, encode_array};
use crate::pipeline::CompressionConfig;

/// Compress a document tree, returning a new tree.
///
/// Depth-first in document order. Sequences the classifier deems eligible
/// become packed leaves; everything else is rebuilt unchanged, so nested
/// eligible sequences inside literal ones are still found. Already-packed
/// nodes pass through untouched, which makes the transform idempotent. The
/// input tree is never modified.
pub fn compress_tree(node: &Node, config: &CompressionConfig) -> Result<Node> {
    match node {
        Node::Mapping(entries) => {
            let mut packed = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                packed.push((key.clone(), compress_tree(value, config)?));
            }
            Ok(Node::Mapping(packed))
        }
        Node::Sequence(items) => match classify(items, config.threshold) {
            Classification::Eligible(kind) => {
                Ok(Node::Packed(encode_array(items, kind, config.dtype)?))
            }
            Classification::Literal => {
                let mut rebuilt = Vec::with_capacity(items.len());
                for item in items {
                    rebuilt.push(compress_tree(item, config)?);
                }
                Ok(Node::Sequence(rebuilt))
            }
        },
        Node::Scalar(scalar) => Ok(Node::Scalar(scalar.clone())),
        Node::Packed(array) => Ok(Node::Packed(array.clone())),
    }
}

/// Expand every packed array back into its literal sequence, returning a
/// new tree. The input tree is never modified.
pub fn decompress_tree(node: &Node) -> Result<Node> {
    match node {
        Node::Mapping(entries) => {
            let mut expanded = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                expanded.push((key.clone(), decompress_tree(value)?));
            }
            Ok(Node::Mapping(expanded))
        }
        Node::Sequence(items) => {
            let mut rebuilt = Vec::with_capacity(items.len());
            for item in items {
                rebuilt.push(decompress_tree(item)?);
            }
            Ok(Node::Sequence(rebuilt))
        }
        Node::Scalar(scalar) => Ok(Node::Scalar(scalar.clone())),
        Node::Packed(array) => Ok(Node::Sequence(decode_array(array)?)),
    }
}
