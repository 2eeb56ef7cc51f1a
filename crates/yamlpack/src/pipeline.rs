//! Document-level pipeline: configuration, entry points, statistics, and
//! inspection.

use std::fs;
use std::path::Path;

use serde::Serialize;
use yamlpack_core::{FloatDtype, Node, PackedDtype, Result, YamlpackError};

use crate::document::{load_document, save_document};
use crate::transform::{compress_tree, decompress_tree};

/// Configuration for document compression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Minimum element count before a sequence is packed
    pub threshold: usize,
    /// Target float width; integers always pack losslessly at 64 bits
    pub dtype: FloatDtype,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            threshold: 10,
            dtype: FloatDtype::Float32,
        }
    }
}

impl CompressionConfig {
    /// Config that preserves every float bit-exactly
    #[must_use]
    pub fn lossless() -> Self {
        Self {
            dtype: FloatDtype::Float64,
            ..Self::default()
        }
    }

    /// Config with the smallest output, trading float precision
    #[must_use]
    pub fn compact() -> Self {
        Self {
            dtype: FloatDtype::Float16,
            ..Self::default()
        }
    }

    /// Set the packing threshold
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject configurations the pipeline must not run with.
    pub fn validate(&self) -> Result<()> {
        if self.threshold < 1 {
            return Err(YamlpackError::Config(format!(
                "threshold must be at least 1, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Statistics from compressing one document
#[derive(Debug, Clone, Serialize)]
pub struct CompressionStats {
    /// Source file size in bytes
    pub input_bytes: u64,
    /// Output file size in bytes
    pub output_bytes: u64,
    /// Input/output size ratio (higher is better)
    pub ratio: f64,
    /// Number of sequences packed
    pub arrays_packed: usize,
    /// Total elements across packed sequences
    pub values_packed: usize,
}

impl CompressionStats {
    fn new(
        input_bytes: u64,
        output_bytes: u64,
        arrays_packed: usize,
        values_packed: usize,
    ) -> Self {
        Self {
            input_bytes,
            output_bytes,
            ratio: size_ratio(input_bytes, output_bytes),
            arrays_packed,
            values_packed,
        }
    }
}

/// Statistics from decompressing one document
#[derive(Debug, Clone, Serialize)]
pub struct DecompressionStats {
    /// Source file size in bytes
    pub input_bytes: u64,
    /// Output file size in bytes
    pub output_bytes: u64,
    /// Number of packed arrays expanded
    pub arrays_unpacked: usize,
    /// Total elements across expanded arrays
    pub values_unpacked: usize,
}

/// Size ratio guarded against a zero-byte output
#[must_use]
pub fn size_ratio(input_bytes: u64, output_bytes: u64) -> f64 {
    if output_bytes == 0 {
        return 0.0;
    }
    input_bytes as f64 / output_bytes as f64
}

/// Bundles a validated configuration with the document entry points.
#[derive(Debug, Clone)]
pub struct DocumentCompressor {
    config: CompressionConfig,
}

impl DocumentCompressor {
    /// Validate the configuration up front, before any file is touched.
    pub fn new(config: CompressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration
    #[must_use]
    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress the document at `input` into `output`.
    pub fn compress(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionStats> {
        let input = input.as_ref();
        let output = output.as_ref();

        let doc = load_document(input)?;
        let packed = compress_tree(&doc, &self.config)?;
        save_document(&packed, output)?;

        let (arrays, values) = packed_totals(&packed);
        Ok(CompressionStats::new(
            fs::metadata(input)?.len(),
            fs::metadata(output)?.len(),
            arrays,
            values,
        ))
    }

    /// Expand the document at `input` into `output`.
    pub fn decompress(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<DecompressionStats> {
        decompress_document(input, output)
    }
}

/// Compress the YAML document at `input` into `output`.
///
/// The configuration is validated before any I/O happens: an invalid
/// threshold fails without touching either path.
pub fn compress_document(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &CompressionConfig,
) -> Result<CompressionStats> {
    DocumentCompressor::new(config.clone())?.compress(input, output)
}

/// Expand every packed array in the YAML document at `input` into `output`.
pub fn decompress_document(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<DecompressionStats> {
    let input = input.as_ref();
    let output = output.as_ref();

    let doc = load_document(input)?;
    let (arrays, values) = packed_totals(&doc);
    let expanded = decompress_tree(&doc)?;
    save_document(&expanded, output)?;

    Ok(DecompressionStats {
        input_bytes: fs::metadata(input)?.len(),
        output_bytes: fs::metadata(output)?.len(),
        arrays_unpacked: arrays,
        values_unpacked: values,
    })
}

/// One packed array inside a document
#[derive(Debug, Clone, Serialize)]
pub struct PackedArrayInfo {
    /// Path from the document root, e.g. `result[0].states`
    pub path: String,
    /// Stored element dtype
    pub dtype: PackedDtype,
    /// Element count
    pub len: usize,
    /// Payload size in bytes (before base64 expansion)
    pub payload_bytes: usize,
}

/// Summary of the packed arrays inside a document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub arrays: Vec<PackedArrayInfo>,
    pub values_packed: usize,
    pub payload_bytes: usize,
}

/// Walk the document at `path` and report every packed array in it.
pub fn inspect_document(path: impl AsRef<Path>) -> Result<DocumentReport> {
    let doc = load_document(path)?;
    let mut arrays = Vec::new();
    collect_arrays(&doc, String::new(), &mut arrays);
    let values_packed = arrays.iter().map(|a| a.len).sum();
    let payload_bytes = arrays.iter().map(|a| a.payload_bytes).sum();
    Ok(DocumentReport {
        arrays,
        values_packed,
        payload_bytes,
    })
}

fn collect_arrays(node: &Node, path: String, out: &mut Vec<PackedArrayInfo>) {
    match node {
        Node::Packed(array) => out.push(PackedArrayInfo {
            path: if path.is_empty() {
                "$".to_string()
            } else {
                path
            },
            dtype: array.dtype,
            len: array.len,
            payload_bytes: array.payload.len(),
        }),
        Node::Mapping(entries) => {
            for (key, child) in entries {
                let child_path = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", path, key)
                };
                collect_arrays(child, child_path, out);
            }
        }
        Node::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_arrays(child, format!("{}[{}]", path, index), out);
            }
        }
        Node::Scalar(_) => {}
    }
}

fn packed_totals(node: &Node) -> (usize, usize) {
    match node {
        Node::Packed(array) => (1, array.len),
        Node::Mapping(entries) => entries.iter().fold((0, 0), |(a, v), (_, child)| {
            let (ca, cv) = packed_totals(child);
            (a + ca, v + cv)
        }),
        Node::Sequence(items) => items.iter().fold((0, 0), |(a, v), child| {
            let (ca, cv) = packed_totals(child);
            (a + ca, v + cv)
        }),
        Node::Scalar(_) => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_trajectory(path: &Path, states: usize) {
        let mut text = String::from("meta:\n  name: run-1\n  seed: 7\nresult:\n  - states:\n");
        for i in 0..states {
            text.push_str(&format!("      - {:.1}\n", i as f64 * 0.1));
        }
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_config_defaults_and_presets() {
        let config = CompressionConfig::default();
        assert_eq!(config.threshold, 10);
        assert_eq!(config.dtype, FloatDtype::Float32);

        assert_eq!(CompressionConfig::lossless().dtype, FloatDtype::Float64);
        assert_eq!(CompressionConfig::compact().dtype, FloatDtype::Float16);
        assert_eq!(CompressionConfig::default().with_threshold(3).threshold, 3);
    }

    #[test]
    fn test_config_validation() {
        assert!(CompressionConfig::default().validate().is_ok());
        assert!(CompressionConfig::default()
            .with_threshold(1)
            .validate()
            .is_ok());

        let err = CompressionConfig::default()
            .with_threshold(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, YamlpackError::Config(_)));
    }

    #[test]
    fn test_invalid_config_rejected_before_io() {
        // The input path does not exist; a Config error (not Io) proves
        // validation happens first
        let config = CompressionConfig::default().with_threshold(0);
        let err = compress_document("/nonexistent/in.yaml", "/nonexistent/out.yaml", &config)
            .unwrap_err();
        assert!(
            matches!(err, YamlpackError::Config(_)),
            "expected Config, got {:?}",
            err
        );
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = compress_document(
            dir.path().join("absent.yaml"),
            dir.path().join("out.yaml"),
            &CompressionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, YamlpackError::Io(_)));
    }

    #[test]
    fn test_file_roundtrip_lossless() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("doc.yaml");
        let packed = dir.path().join("doc.packed.yaml");
        let restored = dir.path().join("doc.restored.yaml");
        write_trajectory(&input, 50);

        let stats =
            compress_document(&input, &packed, &CompressionConfig::lossless()).unwrap();
        assert_eq!(stats.arrays_packed, 1);
        assert_eq!(stats.values_packed, 50);
        assert!(stats.input_bytes > 0 && stats.output_bytes > 0);

        let stats = decompress_document(&packed, &restored).unwrap();
        assert_eq!(stats.arrays_unpacked, 1);
        assert_eq!(stats.values_unpacked, 50);

        let original = load_document(&input).unwrap();
        let roundtripped = load_document(&restored).unwrap();
        assert_eq!(original, roundtripped);
    }

    #[test]
    fn test_decompress_plain_document_changes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("plain.yaml");
        let output = dir.path().join("plain.out.yaml");
        std::fs::write(&input, "a: 1\nb: [1, 2, 3]\n").unwrap();

        let stats = decompress_document(&input, &output).unwrap();
        assert_eq!(stats.arrays_unpacked, 0);
        assert_eq!(stats.values_unpacked, 0);
        assert_eq!(
            load_document(&input).unwrap(),
            load_document(&output).unwrap()
        );
    }

    #[test]
    fn test_inspect_reports_paths_and_sizes() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("doc.yaml");
        let packed = dir.path().join("doc.packed.yaml");
        write_trajectory(&input, 24);

        compress_document(&input, &packed, &CompressionConfig::default()).unwrap();
        let report = inspect_document(&packed).unwrap();
        assert_eq!(report.arrays.len(), 1);
        assert_eq!(report.arrays[0].path, "result[0].states");
        assert_eq!(report.arrays[0].dtype, PackedDtype::Float32);
        assert_eq!(report.arrays[0].len, 24);
        assert_eq!(report.arrays[0].payload_bytes, 24 * 4);
        assert_eq!(report.values_packed, 24);
        assert_eq!(report.payload_bytes, 96);
    }

    #[test]
    fn test_inspect_plain_document_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("plain.yaml");
        std::fs::write(&input, "a: 1\n").unwrap();

        let report = inspect_document(&input).unwrap();
        assert!(report.arrays.is_empty());
        assert_eq!(report.values_packed, 0);
    }

    #[test]
    fn test_size_ratio_zero_guard() {
        assert_eq!(size_ratio(100, 0), 0.0);
        assert_eq!(size_ratio(100, 50), 2.0);
    }

    #[test]
    fn test_compressor_exposes_config() {
        let compressor = DocumentCompressor::new(CompressionConfig::compact()).unwrap();
        assert_eq!(compressor.config().dtype, FloatDtype::Float16);
        assert!(DocumentCompressor::new(CompressionConfig::default().with_threshold(0)).is_err());
    }
}
