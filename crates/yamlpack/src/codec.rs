//! Binary encoding and decoding of numeric sequences.
//!
//! Integer sequences pack losslessly as 64-bit signed little-endian values.
//! Float sequences pack at the configured width; narrowing rounds to nearest
//! with ties to even, maps out-of-range values to signed infinity, and maps
//! NaN to the quiet NaN of the target width. Decoding widens back to f64
//! exactly, with no further rounding.

use serde::Serialize;
use yamlpack_core::{
    ElementKind, FloatDtype, Node, PackedArray, PackedDtype, Result, Scalar, YamlpackError,
};

/// Pack a homogeneous numeric sequence into a binary array.
///
/// `kind` is the classifier's verdict; elements that contradict it fail with
/// a format error rather than being coerced. Integer sequences always pack
/// at 64 bits; float sequences pack at `dtype`'s width. The input nodes are
/// read, never modified.
pub fn encode_array(items: &[Node], kind: ElementKind, dtype: FloatDtype) -> Result<PackedArray> {
    match kind {
        ElementKind::Int => encode_ints(items),
        ElementKind::Float => encode_floats(items, dtype),
    }
}

fn encode_ints(items: &[Node]) -> Result<PackedArray> {
    let mut payload = Vec::with_capacity(items.len() * 8);
    for item in items {
        let value = match item {
            Node::Scalar(Scalar::Int(v)) => *v,
            Node::Scalar(Scalar::Uint(v)) => i64::try_from(*v).map_err(|_| {
                YamlpackError::OutOfRange(format!(
                    "integer {} does not fit a signed 64-bit element",
                    v
                ))
            })?,
            other => return Err(kind_mismatch(other, ElementKind::Int)),
        };
        payload.extend_from_slice(&value.to_le_bytes());
    }
    Ok(PackedArray {
        dtype: PackedDtype::Int64,
        len: items.len(),
        payload,
    })
}

fn encode_floats(items: &[Node], dtype: FloatDtype) -> Result<PackedArray> {
    let mut payload = Vec::with_capacity(items.len() * dtype.size_bytes());
    for item in items {
        let value = match item {
            Node::Scalar(Scalar::Float(v)) => *v,
            other => return Err(kind_mismatch(other, ElementKind::Float)),
        };
        match dtype {
            FloatDtype::Float16 => {
                payload.extend_from_slice(&f64_to_f16_bits(value).to_le_bytes());
            }
            FloatDtype::Float32 => {
                payload.extend_from_slice(&f64_to_f32(value).to_le_bytes());
            }
            FloatDtype::Float64 => {
                payload.extend_from_slice(&value.to_le_bytes());
            }
        }
    }
    Ok(PackedArray {
        dtype: dtype.into(),
        len: items.len(),
        payload,
    })
}

fn kind_mismatch(node: &Node, kind: ElementKind) -> YamlpackError {
    YamlpackError::InvalidFormat(format!(
        "cannot pack a {} element into a {} array",
        node.kind_name(),
        kind
    ))
}

/// Unpack a binary array back into literal scalar nodes.
///
/// The payload length must be exactly `len * size_bytes`; any mismatch is a
/// format error, never tolerated. Narrow floats widen to f64 exactly.
pub fn decode_array(array: &PackedArray) -> Result<Vec<Node>> {
    let expected = array.expected_payload_len().ok_or_else(|| {
        YamlpackError::InvalidFormat(format!(
            "element count {} overflows the payload size computation",
            array.len
        ))
    })?;
    if array.payload.len() != expected {
        return Err(YamlpackError::InvalidFormat(format!(
            "payload is {} bytes, expected {} ({} elements of {} bytes)",
            array.payload.len(),
            expected,
            array.len,
            array.dtype.size_bytes()
        )));
    }

    let mut items = Vec::with_capacity(array.len);
    match array.dtype {
        PackedDtype::Int64 => {
            for chunk in array.payload.chunks_exact(8) {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                items.push(Node::Scalar(Scalar::Int(i64::from_le_bytes(bytes))));
            }
        }
        PackedDtype::Float16 => {
            for chunk in array.payload.chunks_exact(2) {
                let bits = u16::from_le_bytes([chunk[0], chunk[1]]);
                items.push(Node::Scalar(Scalar::Float(f16_bits_to_f64(bits))));
            }
        }
        PackedDtype::Float32 => {
            for chunk in array.payload.chunks_exact(4) {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(chunk);
                items.push(Node::Scalar(Scalar::Float(f64::from(f32::from_le_bytes(
                    bytes,
                )))));
            }
        }
        PackedDtype::Float64 => {
            for chunk in array.payload.chunks_exact(8) {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                items.push(Node::Scalar(Scalar::Float(f64::from_le_bytes(bytes))));
            }
        }
    }
    Ok(items)
}

/// Error statistics between an original float slice and its round-tripped
/// reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecisionStats {
    /// Largest absolute difference
    pub max_abs_err: f64,
    /// Largest absolute difference relative to the original, over nonzero
    /// originals
    pub max_rel_err: f64,
}

impl PrecisionStats {
    /// Compare two slices element by element. Lengths must match.
    pub fn compute(original: &[f64], restored: &[f64]) -> Result<Self> {
        if original.len() != restored.len() {
            return Err(YamlpackError::InvalidFormat(format!(
                "cannot compare {} original values against {} restored",
                original.len(),
                restored.len()
            )));
        }
        let mut max_abs_err = 0.0f64;
        let mut max_rel_err = 0.0f64;
        for (&a, &b) in original.iter().zip(restored) {
            let abs = (a - b).abs();
            if abs > max_abs_err {
                max_abs_err = abs;
            }
            if a != 0.0 {
                let rel = abs / a.abs();
                if rel > max_rel_err {
                    max_rel_err = rel;
                }
            }
        }
        Ok(Self {
            max_abs_err,
            max_rel_err,
        })
    }
}

// --- Float width conversion helpers ---

/// Narrow an f64 to f32. The language cast rounds to nearest with ties to
/// even and maps out-of-range values to signed infinity; NaN is pinned to
/// the canonical quiet pattern.
#[inline]
fn f64_to_f32(value: f64) -> f32 {
    if value.is_nan() {
        f32::NAN
    } else {
        value as f32
    }
}

/// Narrow an f64 to IEEE-754 binary16 bits, rounding to nearest with ties
/// to even. Values beyond the binary16 range become signed infinity; NaN
/// becomes the quiet pattern 0x7E00. Converting straight from the 64-bit
/// representation avoids double rounding through f32.
#[inline]
fn f64_to_f16_bits(value: f64) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 48) & 0x8000) as u16;
    let exp = ((bits >> 52) & 0x7FF) as i32;
    let frac = bits & 0x000F_FFFF_FFFF_FFFF;

    if exp == 0x7FF {
        // Infinity keeps its sign; every NaN canonicalizes to quiet
        return if frac == 0 { sign | 0x7C00 } else { sign | 0x7E00 };
    }
    if exp == 0 {
        // f64 subnormals sit far below half the smallest binary16 subnormal
        return sign;
    }

    let unbiased = exp - 1023;
    if unbiased >= 16 {
        return sign | 0x7C00;
    }
    if unbiased >= -14 {
        // Normal range: keep 10 fraction bits, round the remaining 42
        let mut out = (((unbiased + 15) as u16) << 10) | ((frac >> 42) as u16);
        let rem = frac & ((1u64 << 42) - 1);
        let halfway = 1u64 << 41;
        if rem > halfway || (rem == halfway && out & 1 == 1) {
            // A carry rolls into the exponent; 0x7BFF + 1 is infinity
            out += 1;
        }
        return sign | out;
    }
    if unbiased >= -25 {
        // Subnormal range: shift the full significand into place and round.
        // A carry past the top fraction bit lands on the smallest normal.
        let sig = (1u64 << 52) | frac;
        let shift = (28 - unbiased) as u32;
        let mut out = (sig >> shift) as u16;
        let rem = sig & ((1u64 << shift) - 1);
        let halfway = 1u64 << (shift - 1);
        if rem > halfway || (rem == halfway && out & 1 == 1) {
            out += 1;
        }
        return sign | out;
    }
    // Below half the smallest subnormal: round to signed zero
    sign
}

/// Widen IEEE-754 binary16 bits to f64. Every binary16 value is exactly
/// representable in f64, so this never rounds.
#[inline]
fn f16_bits_to_f64(bits: u16) -> f64 {
    let sign = u64::from(bits >> 15);
    let exp = u64::from((bits >> 10) & 0x1F);
    let frac = u64::from(bits & 0x3FF);

    if exp == 0x1F {
        let out = if frac == 0 {
            (sign << 63) | 0x7FF0_0000_0000_0000
        } else {
            (sign << 63) | 0x7FF8_0000_0000_0000 | (frac << 42)
        };
        return f64::from_bits(out);
    }
    if exp == 0 {
        if frac == 0 {
            return f64::from_bits(sign << 63);
        }
        // Subnormal: renormalize into the f64 exponent range
        let mut frac = frac;
        let mut e: i64 = 0;
        while frac & 0x400 == 0 {
            frac <<= 1;
            e -= 1;
        }
        frac &= 0x3FF;
        let exp64 = (1023 - 15 + 1 + e) as u64;
        return f64::from_bits((sign << 63) | (exp64 << 52) | (frac << 42));
    }
    let exp64 = exp + (1023 - 15);
    f64::from_bits((sign << 63) | (exp64 << 52) | (frac << 42))
}
