use super::error::BitError;

/// Forward-seekable, bit-addressable reader over a borrowed buffer.
///
/// Fields are read most-significant-bit first, matching the order in which
/// blocks emit symbol bits. A failed read leaves the position untouched.
///
/// # Examples
/// ```
/// use chromaframe_core::bits::BitCursor;
///
/// let bytes = [0b1010_0000, 0xff];
/// let mut cursor = BitCursor::new(&bytes);
/// assert_eq!(cursor.read_uint(4).unwrap(), 0b1010);
/// assert_eq!(cursor.position(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    bytes: &'a [u8],
    len_bits: usize,
    position: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            len_bits: bytes.len() * 8,
            position: 0,
        }
    }

    /// Cursor over the first `len_bits` bits of `bytes`; trailing padding is
    /// not readable.
    pub fn with_bit_len(bytes: &'a [u8], len_bits: usize) -> Self {
        Self {
            bytes,
            len_bits: len_bits.min(bytes.len() * 8),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len_bits(&self) -> usize {
        self.len_bits
    }

    pub fn remaining(&self) -> usize {
        self.len_bits - self.position
    }

    /// Fail fast when the whole buffer is shorter than a fixed layout.
    pub fn require_bits(&self, needed: usize) -> Result<(), BitError> {
        if self.len_bits < needed {
            return Err(BitError::OutOfRange {
                position: 0,
                requested: needed,
                available: self.len_bits,
            });
        }
        Ok(())
    }

    pub fn seek(&mut self, target: usize) -> Result<(), BitError> {
        if target > self.len_bits {
            return Err(BitError::SeekOutOfRange {
                target: target as i64,
                available: self.len_bits,
            });
        }
        self.position = target;
        Ok(())
    }

    /// Move relative to the current position; negative deltas rewind.
    pub fn advance(&mut self, delta: i64) -> Result<(), BitError> {
        let target = (self.position as i64).saturating_add(delta);
        if target < 0 || target > self.len_bits as i64 {
            return Err(BitError::SeekOutOfRange {
                target,
                available: self.len_bits,
            });
        }
        self.position = target as usize;
        Ok(())
    }

    pub fn read_uint(&mut self, bits: usize) -> Result<u64, BitError> {
        if bits > 64 {
            return Err(BitError::WidthTooLarge { bits });
        }
        self.check(bits)?;
        let mut value = 0u64;
        for offset in 0..bits {
            value = (value << 1) | u64::from(self.bit_at(self.position + offset));
        }
        self.position += bits;
        Ok(value)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, BitError> {
        let bits = count.checked_mul(8).ok_or(BitError::OutOfRange {
            position: self.position,
            requested: usize::MAX,
            available: self.len_bits,
        })?;
        self.read_bits(bits)
    }

    /// Read `bits` bits into bytes, zero-padding the final partial byte.
    pub fn read_bits(&mut self, bits: usize) -> Result<Vec<u8>, BitError> {
        self.check(bits)?;
        let mut out = vec![0u8; bits.div_ceil(8)];
        if self.position % 8 == 0 {
            let start = self.position / 8;
            let len = out.len();
            out.copy_from_slice(&self.bytes[start..start + len]);
            let tail = bits % 8;
            if tail != 0 {
                if let Some(last) = out.last_mut() {
                    *last &= 0xff << (8 - tail);
                }
            }
        } else {
            for offset in 0..bits {
                if self.bit_at(self.position + offset) {
                    out[offset / 8] |= 0x80 >> (offset % 8);
                }
            }
        }
        self.position += bits;
        Ok(out)
    }

    /// Read `bits` bits as lowercase hexadecimal, one character per nibble.
    pub fn read_hex(&mut self, bits: usize) -> Result<String, BitError> {
        if bits % 4 != 0 {
            return Err(BitError::InvalidHexWidth { bits });
        }
        let bytes = self.read_bits(bits)?;
        let mut digest = hex::encode(bytes);
        digest.truncate(bits / 4);
        Ok(digest)
    }

    fn check(&self, requested: usize) -> Result<(), BitError> {
        if requested > self.remaining() {
            return Err(BitError::OutOfRange {
                position: self.position,
                requested,
                available: self.len_bits,
            });
        }
        Ok(())
    }

    fn bit_at(&self, index: usize) -> bool {
        (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1
    }
}
