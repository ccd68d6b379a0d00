/// CRC32 (IEEE, zlib-compatible) over a header's checksum region.
pub(crate) fn header_crc32(region: &[u8]) -> u32 {
    crc32fast::hash(region)
}
