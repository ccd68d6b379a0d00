use crate::bits::{BitCursor, BitError};
use crate::geometry::BlockGeometry;
use crate::palette::{CustomPaletteId, MAX_DEFAULT_PALETTE_ID, PaletteId};

use super::layout;

pub struct InitializerReader<'c, 'a> {
    cursor: &'c mut BitCursor<'a>,
}

impl<'c, 'a> InitializerReader<'c, 'a> {
    pub fn new(cursor: &'c mut BitCursor<'a>) -> Self {
        Self { cursor }
    }

    pub fn require_layout(&self) -> Result<(), BitError> {
        self.cursor.require_bits(layout::TOTAL_BITS)
    }

    pub fn rewind(&mut self) -> Result<(), BitError> {
        self.cursor.seek(0)
    }

    /// Zero-padded bytes of the checksummed prefix and the checksum itself.
    pub fn read_checksum_region(&mut self) -> Result<(Vec<u8>, u32), BitError> {
        let region = self.cursor.read_bits(layout::CHECKSUM_OFFSET)?;
        let checksum = self.cursor.read_uint(layout::CHECKSUM_BITS)? as u32;
        Ok((region, checksum))
    }

    pub fn read_protocol_version(&mut self) -> Result<u8, BitError> {
        Ok(self.cursor.read_uint(layout::PROTOCOL_VERSION_BITS)? as u8)
    }

    pub fn read_geometry(&mut self) -> Result<BlockGeometry, BitError> {
        let block_height = self.cursor.read_uint(layout::BLOCK_HEIGHT_BITS)? as u16;
        let block_width = self.cursor.read_uint(layout::BLOCK_WIDTH_BITS)? as u16;
        Ok(BlockGeometry::new(block_height, block_width))
    }

    /// Read the palette field, deciding between a default ID and a custom
    /// identifier from its trailing byte.
    pub fn read_palette_id(&mut self) -> Result<PaletteId, BitError> {
        self.cursor
            .seek(layout::PALETTE_FIELD_OFFSET + layout::PALETTE_RESERVED_BITS)?;
        let default_id = self.cursor.read_uint(layout::DEFAULT_PALETTE_ID_BITS)? as u8;
        if default_id <= MAX_DEFAULT_PALETTE_ID {
            return Ok(PaletteId::Default(default_id));
        }

        self.cursor.advance(-(layout::CUSTOM_PALETTE_ID_BITS as i64))?;
        let raw = self.cursor.read_bytes(layout::CUSTOM_PALETTE_ID_BITS / 8)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(PaletteId::Custom(CustomPaletteId::from_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::InitializerReader;
    use crate::bits::{BitBuffer, BitCursor};
    use crate::headers::initializer::layout;
    use crate::palette::PaletteId;

    fn with_palette_field(field: &[u8; 32]) -> BitBuffer {
        let mut bits = BitBuffer::new();
        bits.push_uint(1, 4);
        bits.push_uint(10, 16);
        bits.push_uint(20, 16);
        bits.push_bytes(field);
        bits.push_uint(0, 32);
        bits
    }

    #[test]
    fn small_trailing_byte_is_default_id() {
        let mut field = [0u8; 32];
        field[31] = 100;
        let bits = with_palette_field(&field);
        let mut cursor = bits.cursor();
        let mut reader = InitializerReader::new(&mut cursor);
        assert_eq!(reader.read_palette_id().unwrap(), PaletteId::Default(100));
        assert_eq!(cursor.position(), layout::CHECKSUM_OFFSET);
    }

    #[test]
    fn large_trailing_byte_rereads_whole_field() {
        let mut field = [0x5a; 32];
        field[31] = 101;
        let bits = with_palette_field(&field);
        let mut cursor = bits.cursor();
        let mut reader = InitializerReader::new(&mut cursor);
        match reader.read_palette_id().unwrap() {
            PaletteId::Custom(id) => {
                assert_eq!(id.as_bytes(), &field);
                assert_eq!(id.trailing_byte(), 101);
            }
            other => panic!("expected custom id, got {other:?}"),
        }
        assert_eq!(cursor.position(), layout::CHECKSUM_OFFSET);
    }

    #[test]
    fn geometry_follows_version() {
        let bits = with_palette_field(&[0u8; 32]);
        let mut cursor = bits.cursor();
        let mut reader = InitializerReader::new(&mut cursor);
        assert_eq!(reader.read_protocol_version().unwrap(), 1);
        let geometry = reader.read_geometry().unwrap();
        assert_eq!((geometry.block_height, geometry.block_width), (10, 20));
    }

    #[test]
    fn layout_check_rejects_short_buffer() {
        let bytes = [0u8; 40];
        let mut cursor = BitCursor::new(&bytes);
        let reader = InitializerReader::new(&mut cursor);
        assert!(reader.require_layout().is_err());
    }
}
