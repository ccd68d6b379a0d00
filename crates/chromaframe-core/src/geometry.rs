use serde::{Deserialize, Serialize};

/// Block grid dimensions established by the lock-on step, in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub block_height: u16,
    pub block_width: u16,
}

impl BlockGeometry {
    pub fn new(block_height: u16, block_width: u16) -> Self {
        Self {
            block_height,
            block_width,
        }
    }

    pub fn block_count(&self) -> usize {
        usize::from(self.block_height) * usize::from(self.block_width)
    }
}

/// Guard run before decoding when the caller overrides the block size.
///
/// Returns `false` (and emits a warning) when both overrides are given and
/// either exceeds the active frame area; missing overrides always pass.
///
/// # Examples
/// ```
/// use chromaframe_core::minimum_block_checkpoint;
///
/// assert!(minimum_block_checkpoint(Some(40), Some(30), 1920, 1080));
/// assert!(!minimum_block_checkpoint(Some(40), Some(2000), 1920, 1080));
/// assert!(minimum_block_checkpoint(None, Some(2000), 1920, 1080));
/// ```
pub fn minimum_block_checkpoint(
    block_height_override: Option<u32>,
    block_width_override: Option<u32>,
    active_width: u32,
    active_height: u32,
) -> bool {
    if let (Some(height), Some(width)) = (block_height_override, block_width_override) {
        if active_width < width || active_height < height {
            tracing::warn!(
                block_height = height,
                block_width = width,
                active_width,
                active_height,
                "block override exceeds the active frame area"
            );
            return false;
        }
    }
    true
}
