//! Failure taxonomy shared by every decoding stage.
//!
//! Each module keeps its own error enum with the diagnostic detail; `kind()`
//! and `severity()` project those errors onto the categories below so that a
//! per-frame loop can decide between skipping a frame and stopping the stream.

use serde::{Deserialize, Serialize};

/// Category of a decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// CRC32 over a header's fixed region did not match.
    ChecksumMismatch,
    /// The stream's protocol version is not supported by this reader.
    UnsupportedProtocol,
    /// Block dimensions disagree with the lock-on geometry.
    GeometryMismatch,
    /// The palette is not registered locally.
    UnknownPalette,
    /// SHA-256 of the decoded payload did not match the frame header.
    PayloadHashMismatch,
    /// Malformed or truncated buffer, or a read outside the pixel grid.
    OutOfRange,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::ChecksumMismatch => "checksum-mismatch",
            FailureKind::UnsupportedProtocol => "unsupported-protocol",
            FailureKind::GeometryMismatch => "geometry-mismatch",
            FailureKind::UnknownPalette => "unknown-palette",
            FailureKind::PayloadHashMismatch => "payload-hash-mismatch",
            FailureKind::OutOfRange => "out-of-range",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far a failure propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Decoding cannot continue for this stream.
    StreamFatal,
    /// Only the current frame is discarded.
    FrameRecoverable,
}
