use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Protocol versions understood by this reader when no override is given.
pub const DEFAULT_SUPPORTED_PROTOCOLS: [u8; 2] = [1, 2];

/// Reader-side decoding options.
///
/// # Examples
/// ```
/// use chromaframe_core::DecoderConfig;
///
/// let config = DecoderConfig::default();
/// assert!(config.supports(2));
/// assert!(!config.supports(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Protocol versions accepted in the stream initializer.
    pub supported_protocols: BTreeSet<u8>,
}

impl DecoderConfig {
    pub fn with_protocols<I: IntoIterator<Item = u8>>(protocols: I) -> Self {
        Self {
            supported_protocols: protocols.into_iter().collect(),
        }
    }

    pub fn supports(&self, version: u8) -> bool {
        self.supported_protocols.contains(&version)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::with_protocols(DEFAULT_SUPPORTED_PROTOCOLS)
    }
}
