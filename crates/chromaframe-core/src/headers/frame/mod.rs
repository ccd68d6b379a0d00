//! Per-frame header decoding.
//!
//! The 76-byte frame header carries the stream and frame SHA-256 digests,
//! the frame number and the number of payload blocks, protected by a CRC32.
//! A checksum failure discards only the current frame.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::FrameHeaderError;
pub use parser::{FrameHeader, decode_frame_header};
