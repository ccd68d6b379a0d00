//! Bit-level access to header and payload buffers.
//!
//! `cursor` reads fixed-width fields most-significant-bit first from a
//! borrowed byte buffer; `buffer` accumulates symbol bits recovered from
//! blocks. Both report failures through `error::BitError`.

pub mod buffer;
pub mod cursor;
pub mod error;

pub use buffer::BitBuffer;
pub use cursor::BitCursor;
pub use error::BitError;
