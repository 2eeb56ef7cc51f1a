//! Sequence eligibility classification.

use yamlpack_core::{ElementKind, Node, Scalar};

/// Outcome of classifying a sequence for packing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Homogeneous numeric sequence at or above the length threshold
    Eligible(ElementKind),
    /// Sequence stays in literal form
    Literal,
}

/// Decide whether a sequence's elements can be packed.
///
/// A sequence is eligible only when every element is a numeric scalar of the
/// same logical kind and the element count meets `threshold`. Booleans,
/// strings, nulls, nested nodes, and already-packed arrays all force the
/// sequence to stay literal, as does mixing integers with floats.
///
/// Single pass, no allocation.
#[must_use]
pub fn classify(items: &[Node], threshold: usize) -> Classification {
    if items.len() < threshold {
        return Classification::Literal;
    }

    let mut kind: Option<ElementKind> = None;
    for item in items {
        let item_kind = match item {
            Node::Scalar(Scalar::Int(_) | Scalar::Uint(_)) => ElementKind::Int,
            Node::Scalar(Scalar::Float(_)) => ElementKind::Float,
            _ => return Classification::Literal,
        };
        match kind {
            None => kind = Some(item_kind),
            Some(seen) if seen != item_kind => return Classification::Literal,
            Some(_) => {}
        }
    }

    match kind {
        Some(kind) => Classification::Eligible(kind),
        // Empty slice, only reachable with threshold 0; config validation
        // rejects that upstream.
        None => Classification::Literal,
    }
}
