//! ChromaFrame core library for decoding colored-block frame streams.
//!
//! This crate implements the verification pipeline used by the CLI: a
//! lock-on collaborator supplies block geometry and a pixel grid, the header
//! decoders (layout/reader/parser) verify the stream initializer and each
//! frame header, the sampler and palette turn blocks into payload bits, and
//! the payload validator checks them against the frame hash. Decoding is
//! side-effect free apart from `tracing` events; all file I/O stays in the CLI.
//!
//! Invariants:
//! - Every multi-bit field is read MSB-first.
//! - A header is trusted only after its CRC32 verifies.
//! - Stream state (protocol, geometry, palette) is immutable once opened.
//!
//! Version française (résumé):
//! Cette crate fournit le cœur de décodage : en-têtes (layout/reader/parser)
//! -> échantillonnage des blocs -> palette -> vérification SHA-256 du contenu.
//! Les E/S restent dans la CLI. Un en-tête n'est utilisé qu'après contrôle CRC32.
//!
//! # Examples
//! ```no_run
//! use chromaframe_core::{
//!     BitCursor, BlockGeometry, CustomPalettes, DecoderConfig, DefaultPalettes, ScanLayout,
//!     StreamContext,
//! };
//!
//! let initializer = std::fs::read("initializer.bin")?;
//! let layout = ScanLayout::new(BlockGeometry::new(40, 30), 8);
//! let stream = StreamContext::open(
//!     &mut BitCursor::new(&initializer),
//!     layout,
//!     &DecoderConfig::default(),
//!     &CustomPalettes::new(),
//!     &DefaultPalettes::builtin(),
//! )?;
//! println!("protocol: {}", stream.protocol_version());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

pub mod bits;
pub mod config;
pub mod error;
pub mod geometry;
pub mod headers;
pub mod palette;
pub mod payload;
pub mod pipeline;
pub mod sampler;
pub mod scan;

pub use bits::{BitBuffer, BitCursor, BitError};
pub use config::{DEFAULT_SUPPORTED_PROTOCOLS, DecoderConfig};
pub use error::{FailureKind, Severity};
pub use geometry::{BlockGeometry, minimum_block_checkpoint};
pub use headers::{
    FrameHeader, FrameHeaderError, InitializerError, StreamInitializer, decode_frame_header,
    decode_initializer,
};
pub use palette::{
    CustomPaletteId, CustomPaletteLookup, CustomPalettes, DefaultPalettes, Palette, PaletteError,
    PaletteId, PaletteMetadata, UnknownPaletteRegistrar,
};
pub use payload::{PayloadError, payload_digest, validate_payload, verify_payload};
pub use pipeline::{
    AcceptedFrame, FrameError, FrameOutcome, FrameTally, SkippedFrame, StreamContext,
};
pub use sampler::{PixelGrid, Rgb, RgbImage, SampleError, sample_block};
pub use scan::{ScanError, ScanLayout, scan_blocks};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used so reports stay reproducible.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoding report for a single CLI invocation.
///
/// # Examples
/// ```
/// use chromaframe_core::make_stub_report;
///
/// let report = make_stub_report("initializer.bin", 41);
/// assert_eq!(report.report_version, chromaframe_core::REPORT_VERSION);
/// assert!(report.initializer.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Input file metadata, absent for commands that read no file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<InitializerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_header: Option<FrameHeaderSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<CheckpointSummary>,
    /// Present when decoding stopped or the frame was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureSummary>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "chromaframe").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input file metadata embedded in reports.
///
/// # Examples
/// ```
/// use chromaframe_core::InputInfo;
///
/// let input = InputInfo {
///     path: "frame_header.bin".to_string(),
///     bytes: 76,
/// };
/// assert_eq!(input.bytes, 76);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as resolved by the CLI.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Palette description, shared by default and custom palettes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSummary {
    /// Decimal ID for default palettes, 64 hex digits for custom ones.
    pub id: String,
    pub custom: bool,
    pub name: String,
    pub bit_width: u8,
    /// Colors in symbol order, as `#rrggbb`.
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RFC3339 creation timestamp of a custom palette.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl From<&Palette> for PaletteSummary {
    fn from(palette: &Palette) -> Self {
        Self {
            id: palette.id().to_string(),
            custom: palette.id().is_custom(),
            name: palette.name().to_string(),
            bit_width: palette.bit_width(),
            colors: palette.colors().iter().map(Rgb::to_string).collect(),
            description: palette.description().map(str::to_string),
            created: palette
                .created()
                .and_then(|created| created.format(&Rfc3339).ok()),
        }
    }
}

/// Verified stream initializer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializerSummary {
    pub protocol_version: u8,
    pub block_height: u16,
    pub block_width: u16,
    pub palette: PaletteSummary,
}

impl From<&StreamInitializer> for InitializerSummary {
    fn from(initializer: &StreamInitializer) -> Self {
        Self {
            protocol_version: initializer.protocol_version,
            block_height: initializer.geometry.block_height,
            block_width: initializer.geometry.block_width,
            palette: PaletteSummary::from(initializer.palette.as_ref()),
        }
    }
}

/// Verified frame header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeaderSummary {
    pub stream_hash: String,
    pub frame_hash: String,
    pub frame_number: u32,
    pub block_count: u32,
}

impl From<&FrameHeader> for FrameHeaderSummary {
    fn from(header: &FrameHeader) -> Self {
        Self {
            stream_hash: header.stream_hash.clone(),
            frame_hash: header.frame_hash.clone(),
            frame_number: header.frame_number,
            block_count: header.block_count,
        }
    }
}

/// Result of hashing a payload against its frame hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSummary {
    /// Number of payload bits hashed.
    pub bits: usize,
    /// Computed SHA-256, lowercase hex.
    pub digest: String,
    /// Frame hash the payload was checked against.
    pub expected: String,
    pub valid: bool,
}

impl PayloadSummary {
    pub fn check(payload: &BitBuffer, expected: &str) -> Self {
        Self::verify(payload, expected).0
    }

    /// Hashes the payload once and returns the summary together with the
    /// mismatch error, if any.
    pub fn verify(payload: &BitBuffer, expected: &str) -> (Self, Result<(), PayloadError>) {
        let digest = payload_digest(payload);
        let result = payload::verify_digest(&digest, expected, payload.len());
        let summary = Self {
            bits: payload.len(),
            digest,
            expected: expected.to_string(),
            valid: result.is_ok(),
        };
        (summary, result)
    }
}

/// Outcome of the block-size pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSummary {
    pub active_width: u32,
    pub active_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u32>,
    pub passed: bool,
}

/// Categorized failure, as projected by each error's `kind()`/`severity()`.
///
/// # Examples
/// ```
/// use chromaframe_core::{FailureKind, FailureSummary, FrameHeaderError, Severity};
///
/// let err = FrameHeaderError::ChecksumMismatch { expected: 1, computed: 2 };
/// let failure = FailureSummary::new(err.kind(), err.severity(), &err);
/// assert_eq!(failure.kind, FailureKind::ChecksumMismatch);
/// assert_eq!(failure.severity, Severity::FrameRecoverable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub kind: FailureKind,
    pub severity: Severity,
    pub message: String,
}

impl FailureSummary {
    pub fn new(kind: FailureKind, severity: Severity, message: impl ToString) -> Self {
        Self {
            kind,
            severity,
            message: message.to_string(),
        }
    }
}

/// Build a report with base fields filled and no decoded sections.
///
/// # Examples
/// ```
/// use chromaframe_core::make_stub_report;
///
/// let report = make_stub_report("frame_header.bin", 76);
/// assert_eq!(report.input.unwrap().bytes, 76);
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    let mut report = make_empty_report();
    report.input = Some(InputInfo {
        path: input_path.to_string(),
        bytes: input_bytes,
    });
    report
}

/// Build a report with no input and no decoded sections.
pub fn make_empty_report() -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "chromaframe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: None,
        initializer: None,
        frame_header: None,
        payload: None,
        checkpoint: None,
        failure: None,
    }
}
