//! Fixed-layout header decoding.
//!
//! Each header follows a layered structure:
//! - `layout`: bit widths and offsets (source of truth)
//! - `reader`: cursor access and field conventions
//! - `parser`: verification and domain-level decoding (no direct bit math)
//! - `error`: explicit, actionable errors
//!
//! The initializer is decoded once per stream and every failure is fatal for
//! the stream. The frame header is decoded per frame; a checksum failure only
//! discards that frame.

pub(crate) mod common;
pub mod frame;
pub mod initializer;

pub use frame::{FrameHeader, FrameHeaderError, decode_frame_header};
pub use initializer::{InitializerError, StreamInitializer, decode_initializer};
