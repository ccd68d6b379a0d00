//! Stream initializer decoding.
//!
//! The initializer is the 324-bit header that opens a stream. Its CRC32 is
//! checked first; then the protocol version, the block geometry and the
//! palette field are validated against what this reader supports and what
//! the lock-on step measured. The palette field is 256 bits wide: values in
//! its last byte up to 100 name a default palette, anything larger turns the
//! whole field into a custom palette identifier.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::InitializerError;
pub use parser::{StreamInitializer, decode_initializer};
