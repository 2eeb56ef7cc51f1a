//! YAML file adapter: parsing, emitting, and the persisted packed-array form.
//!
//! The document text itself is handled by serde_yaml; this module converts
//! between [`serde_yaml::Value`] and the document model, and owns the tagged
//! block that a packed array becomes on disk:
//!
//! ```yaml
//! states: !packed/v1
//!   kind: float
//!   width: 16
//!   len: 10000
//!   data: AAA8AEA...
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value;

use yamlpack_core::{
    ElementKind, Node, PackedArray, PackedDtype, Result, Scalar, YamlpackError,
};

/// Versioned tag that marks a packed array in the document text
pub const PACKED_TAG: &str = "packed/v1";

/// Read and parse a YAML document into the document model.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Node> {
    let file = File::open(path.as_ref())?;
    let value: Value = serde_yaml::from_reader(BufReader::new(file))
        .map_err(|e| YamlpackError::Parse(e.to_string()))?;
    value_to_node(&value)
}

/// Emit a document model tree as YAML at `path`.
pub fn save_document<P: AsRef<Path>>(node: &Node, path: P) -> Result<()> {
    let value = node_to_value(node);
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, &value)
        .map_err(|e| YamlpackError::Io(std::io::Error::other(e)))?;
    writer.flush()?;
    Ok(())
}

/// Parse YAML text into the document model.
pub fn parse_str(text: &str) -> Result<Node> {
    let value: Value =
        serde_yaml::from_str(text).map_err(|e| YamlpackError::Parse(e.to_string()))?;
    value_to_node(&value)
}

/// Emit a document model tree as YAML text.
pub fn emit_str(node: &Node) -> Result<String> {
    serde_yaml::to_string(&node_to_value(node))
        .map_err(|e| YamlpackError::Parse(e.to_string()))
}

/// Convert a parsed YAML value into the document model.
///
/// Numbers keep their parsed kind: integer text stays an integer, float text
/// stays a float. Unsigned integers above `i64::MAX` become [`Scalar::Uint`].
/// The only tag the model accepts is [`PACKED_TAG`]; anything else is
/// foreign input and fails with the format error.
pub fn value_to_node(value: &Value) -> Result<Node> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Ok(Node::Scalar(scalar_from_value(value)?))
        }
        Value::Sequence(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for item in items {
                nodes.push(value_to_node(item)?);
            }
            Ok(Node::Sequence(nodes))
        }
        Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, val) in map {
                let key = scalar_from_value(key).map_err(|_| {
                    YamlpackError::Parse(format!(
                        "mapping keys must be scalars, got a {}",
                        value_kind_name(key)
                    ))
                })?;
                entries.push((key, value_to_node(val)?));
            }
            Ok(Node::Mapping(entries))
        }
        Value::Tagged(tagged) => Ok(Node::Packed(parse_packed(tagged)?)),
    }
}

/// Convert a document model tree into a YAML value for emission.
#[must_use]
pub fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Scalar(scalar) => scalar_to_value(scalar),
        Node::Sequence(items) => Value::Sequence(items.iter().map(node_to_value).collect()),
        Node::Mapping(entries) => {
            let mut map = serde_yaml::Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(scalar_to_value(key), node_to_value(value));
            }
            Value::Mapping(map)
        }
        Node::Packed(array) => {
            let mut map = serde_yaml::Mapping::with_capacity(4);
            map.insert(
                Value::from("kind"),
                Value::from(array.dtype.kind().as_str()),
            );
            map.insert(
                Value::from("width"),
                Value::from(u64::from(array.dtype.width_bits())),
            );
            map.insert(Value::from("len"), Value::from(array.len as u64));
            map.insert(Value::from("data"), Value::from(STANDARD.encode(&array.payload)));
            Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(PACKED_TAG),
                value: Value::Mapping(map),
            }))
        }
    }
}

fn scalar_from_value(value: &Value) -> Result<Scalar> {
    match value {
        Value::Null => Ok(Scalar::Null),
        Value::Bool(v) => Ok(Scalar::Bool(*v)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Scalar::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Scalar::Uint(u))
            } else {
                Ok(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Value::String(s) => Ok(Scalar::Str(s.clone())),
        other => Err(YamlpackError::Parse(format!(
            "expected a scalar, got a {}",
            value_kind_name(other)
        ))),
    }
}

fn scalar_to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(v) => Value::from(*v),
        Scalar::Int(v) => Value::from(*v),
        Scalar::Uint(v) => Value::from(*v),
        Scalar::Float(v) => Value::from(*v),
        Scalar::Str(v) => Value::from(v.clone()),
    }
}

fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Reconstruct a packed array from its tagged block.
///
/// An unknown tag, a missing or ill-typed field, an undefined kind/width
/// combination, and undecodable base64 all fail with the format error.
/// Payload length is validated later, at decode time.
fn parse_packed(tagged: &TaggedValue) -> Result<PackedArray> {
    if tagged.tag != PACKED_TAG {
        return Err(YamlpackError::InvalidFormat(format!(
            "unrecognized tag {}, expected !{}",
            tagged.tag, PACKED_TAG
        )));
    }
    let map = tagged.value.as_mapping().ok_or_else(|| {
        YamlpackError::InvalidFormat(format!("!{} block must be a mapping", PACKED_TAG))
    })?;

    let kind = field(map, "kind")
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field("kind"))?;
    let kind = ElementKind::parse(kind).ok_or_else(|| {
        YamlpackError::InvalidFormat(format!("unrecognized element kind \"{}\"", kind))
    })?;

    let width = field(map, "width")
        .and_then(Value::as_u64)
        .ok_or_else(|| missing_field("width"))?;
    let dtype = u32::try_from(width)
        .ok()
        .and_then(|w| PackedDtype::from_parts(kind, w))
        .ok_or_else(|| {
            YamlpackError::InvalidFormat(format!(
                "unrecognized width {} for {} arrays",
                width, kind
            ))
        })?;

    let len = field(map, "len")
        .and_then(Value::as_u64)
        .ok_or_else(|| missing_field("len"))?;
    let len = usize::try_from(len).map_err(|_| {
        YamlpackError::InvalidFormat(format!("element count {} is not addressable", len))
    })?;

    let data = field(map, "data")
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field("data"))?;
    let payload = STANDARD.decode(data).map_err(|e| {
        YamlpackError::InvalidFormat(format!("payload is not valid base64: {}", e))
    })?;

    Ok(PackedArray {
        dtype,
        len,
        payload,
    })
}

fn field<'a>(map: &'a serde_yaml::Mapping, name: &str) -> Option<&'a Value> {
    map.get(&Value::from(name))
}

fn missing_field(name: &str) -> YamlpackError {
    YamlpackError::InvalidFormat(format!(
        "packed array block is missing the `{}` field",
        name
    ))
}
