use super::cursor::BitCursor;

/// Append-only bit sequence assembled from block symbols.
///
/// The byte representation pads the final partial byte with zero bits, so
/// digests computed over `as_bytes` are stable for any bit length.
///
/// # Examples
/// ```
/// use chromaframe_core::bits::BitBuffer;
///
/// let mut bits = BitBuffer::new();
/// bits.push_uint(0b101, 3);
/// assert_eq!(bits.len(), 3);
/// assert_eq!(bits.as_bytes(), &[0b1010_0000]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len() * 8;
        Self { bytes, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let index = self.len / 8;
            self.bytes[index] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Append the low `width` bits of `value`, most significant first.
    pub fn push_uint(&mut self, value: u64, width: u8) {
        debug_assert!(width <= 64);
        for shift in (0..u32::from(width.min(64))).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(bytes);
            self.len += bytes.len() * 8;
            return;
        }
        for byte in bytes {
            self.push_uint(u64::from(*byte), 8);
        }
    }

    /// Drop every bit from `len` on, clearing the padding of the last byte.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.bytes.truncate(len.div_ceil(8));
        let partial = len % 8;
        if partial != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xffu8 << (8 - partial);
            }
        }
        self.len = len;
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// Flip one bit in place; returns the new value, or `None` past the end.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        self.bytes[index / 8] ^= 0x80 >> (index % 8);
        self.get(index)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn cursor(&self) -> BitCursor<'_> {
        BitCursor::with_bit_len(&self.bytes, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::BitBuffer;

    #[test]
    fn push_uint_is_msb_first() {
        let mut bits = BitBuffer::new();
        bits.push_uint(0x2, 4);
        bits.push_uint(0x1ff, 9);
        assert_eq!(bits.len(), 13);
        assert_eq!(bits.as_bytes(), &[0x2f, 0xf8]);
    }

    #[test]
    fn push_bytes_unaligned() {
        let mut bits = BitBuffer::new();
        bits.push_bit(true);
        bits.push_bytes(&[0x00, 0xff]);
        assert_eq!(bits.len(), 17);
        assert_eq!(bits.as_bytes(), &[0x80, 0x7f, 0x80]);
    }

    #[test]
    fn toggle_flips_single_bit() {
        let mut bits = BitBuffer::from_bytes(vec![0x00]);
        assert_eq!(bits.toggle(7), Some(true));
        assert_eq!(bits.as_bytes(), &[0x01]);
        assert_eq!(bits.toggle(8), None);
    }

    #[test]
    fn truncate_clears_dropped_bits() {
        let mut bits = BitBuffer::from_bytes(vec![0xff, 0xff]);
        bits.truncate(11);
        assert_eq!(bits.len(), 11);
        assert_eq!(bits.as_bytes(), &[0xff, 0xe0]);
        bits.truncate(8);
        assert_eq!(bits.as_bytes(), &[0xff]);
        bits.truncate(20);
        assert_eq!(bits.len(), 8);
    }

    #[test]
    fn cursor_reads_back_pushed_fields() {
        let mut bits = BitBuffer::new();
        bits.push_uint(9, 4);
        bits.push_uint(40, 16);
        let mut cursor = bits.cursor();
        assert_eq!(cursor.read_uint(4).unwrap(), 9);
        assert_eq!(cursor.read_uint(16).unwrap(), 40);
        assert_eq!(cursor.remaining(), 0);
    }
}
