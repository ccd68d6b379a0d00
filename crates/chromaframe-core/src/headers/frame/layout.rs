pub const STREAM_HASH_BITS: usize = 256;
pub const FRAME_HASH_BITS: usize = 256;
pub const FRAME_NUMBER_BITS: usize = 32;
pub const BLOCK_COUNT_BITS: usize = 32;

pub const CHECKSUM_COVERED_BYTES: usize =
    (STREAM_HASH_BITS + FRAME_HASH_BITS + FRAME_NUMBER_BITS + BLOCK_COUNT_BITS) / 8;
pub const CHECKSUM_BITS: usize = 32;

pub const TOTAL_BYTES: usize = CHECKSUM_COVERED_BYTES + CHECKSUM_BITS / 8;
pub const TOTAL_BITS: usize = TOTAL_BYTES * 8;
