pub const PROTOCOL_VERSION_BITS: usize = 4;
pub const BLOCK_HEIGHT_BITS: usize = 16;
pub const BLOCK_WIDTH_BITS: usize = 16;

pub const PALETTE_FIELD_OFFSET: usize =
    PROTOCOL_VERSION_BITS + BLOCK_HEIGHT_BITS + BLOCK_WIDTH_BITS;
pub const PALETTE_RESERVED_BITS: usize = 248;
pub const DEFAULT_PALETTE_ID_BITS: usize = 8;
pub const CUSTOM_PALETTE_ID_BITS: usize = PALETTE_RESERVED_BITS + DEFAULT_PALETTE_ID_BITS;

pub const CHECKSUM_OFFSET: usize = PALETTE_FIELD_OFFSET + CUSTOM_PALETTE_ID_BITS;
pub const CHECKSUM_BITS: usize = 32;

pub const TOTAL_BITS: usize = CHECKSUM_OFFSET + CHECKSUM_BITS;
