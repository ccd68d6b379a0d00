use crate::bits::{BitCursor, BitError};

use super::layout;

pub struct FrameHeaderReader<'c, 'a> {
    cursor: &'c mut BitCursor<'a>,
}

impl<'c, 'a> FrameHeaderReader<'c, 'a> {
    pub fn new(cursor: &'c mut BitCursor<'a>) -> Self {
        Self { cursor }
    }

    pub fn require_layout(&self) -> Result<(), BitError> {
        self.cursor.require_bits(layout::TOTAL_BITS)
    }

    pub fn rewind(&mut self) -> Result<(), BitError> {
        self.cursor.seek(0)
    }

    pub fn read_checksum_region(&mut self) -> Result<(Vec<u8>, u32), BitError> {
        let region = self.cursor.read_bytes(layout::CHECKSUM_COVERED_BYTES)?;
        let checksum = self.cursor.read_uint(layout::CHECKSUM_BITS)? as u32;
        Ok((region, checksum))
    }

    /// Stream and frame digests, in wire order.
    pub fn read_hashes(&mut self) -> Result<(String, String), BitError> {
        let stream_hash = self.cursor.read_hex(layout::STREAM_HASH_BITS)?;
        let frame_hash = self.cursor.read_hex(layout::FRAME_HASH_BITS)?;
        Ok((stream_hash, frame_hash))
    }

    /// Frame number and payload block count, in wire order.
    pub fn read_counters(&mut self) -> Result<(u32, u32), BitError> {
        let frame_number = self.cursor.read_uint(layout::FRAME_NUMBER_BITS)? as u32;
        let block_count = self.cursor.read_uint(layout::BLOCK_COUNT_BITS)? as u32;
        Ok((frame_number, block_count))
    }
}
