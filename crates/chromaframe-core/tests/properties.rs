use chromaframe_core::headers::initializer::layout;
use chromaframe_core::{
    BitBuffer, BitCursor, BlockGeometry, CustomPalettes, DecoderConfig, DefaultPalettes,
    FrameHeaderError, InitializerError, Rgb, RgbImage, decode_frame_header, decode_initializer,
    minimum_block_checkpoint, payload_digest, sample_block, validate_payload,
};
use proptest::prelude::*;

fn sealed_frame_header(prefix: &[u8]) -> Vec<u8> {
    let mut bytes = prefix.to_vec();
    let crc = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&crc.to_be_bytes());
    bytes
}

fn sealed_initializer(version: u8, height: u16, width: u16, palette: u8) -> Vec<u8> {
    let mut bits = BitBuffer::new();
    bits.push_uint(u64::from(version), 4);
    bits.push_uint(u64::from(height), 16);
    bits.push_uint(u64::from(width), 16);
    bits.push_bytes(&[0; 31]);
    bits.push_uint(u64::from(palette), 8);
    let prefix = bits.cursor().read_bits(layout::CHECKSUM_OFFSET).expect("prefix");
    bits.push_uint(u64::from(crc32fast::hash(&prefix)), 32);
    bits.into_bytes()
}

fn decode_sealed(bytes: &[u8], height: u16, width: u16) -> Result<u8, InitializerError> {
    decode_initializer(
        &mut BitCursor::new(bytes),
        BlockGeometry::new(height, width),
        &DecoderConfig::with_protocols(0..16),
        &CustomPalettes::new(),
        &DefaultPalettes::builtin(),
    )
    .map(|initializer| initializer.protocol_version)
}

proptest! {
    #[test]
    fn payload_validates_against_its_own_digest(
        bytes in proptest::collection::vec(any::<u8>(), 0..256)
    ) {
        let payload = BitBuffer::from_bytes(bytes);
        prop_assert!(validate_payload(&payload, &payload_digest(&payload)));
    }

    #[test]
    fn any_single_bit_flip_fails_validation(
        bytes in proptest::collection::vec(any::<u8>(), 1..128),
        flip in any::<prop::sample::Index>(),
    ) {
        let mut payload = BitBuffer::from_bytes(bytes);
        let digest = payload_digest(&payload);
        payload.toggle(flip.index(payload.len()));
        prop_assert!(!validate_payload(&payload, &digest));
    }

    #[test]
    fn sealed_frame_header_decodes(prefix in proptest::collection::vec(any::<u8>(), 72)) {
        let bytes = sealed_frame_header(&prefix);
        let header = decode_frame_header(&mut BitCursor::new(&bytes)).unwrap();
        prop_assert_eq!(header.stream_hash, hex::encode(&prefix[..32]));
        prop_assert_eq!(header.frame_hash, hex::encode(&prefix[32..64]));
    }

    #[test]
    fn mutated_frame_header_byte_is_detected(
        prefix in proptest::collection::vec(any::<u8>(), 72),
        position in 0usize..72,
        mask in 1u8..=255,
    ) {
        let mut bytes = sealed_frame_header(&prefix);
        bytes[position] ^= mask;
        let err = decode_frame_header(&mut BitCursor::new(&bytes)).unwrap_err();
        let is_checksum = matches!(err, FrameHeaderError::ChecksumMismatch { .. });
        prop_assert!(is_checksum);
    }

    #[test]
    fn sealed_initializer_passes_checksum(
        version in 0u8..16,
        height in any::<u16>(),
        width in any::<u16>(),
        palette in 0u8..4,
    ) {
        let bytes = sealed_initializer(version, height, width, palette);
        prop_assert_eq!(decode_sealed(&bytes, height, width).unwrap(), version);
    }

    #[test]
    fn mutated_initializer_prefix_is_detected(
        height in any::<u16>(),
        width in any::<u16>(),
        position in 0usize..36,
        mask in 1u8..=255,
    ) {
        let mut bytes = sealed_initializer(2, height, width, 0);
        bytes[position] ^= mask;
        let err = decode_sealed(&bytes, height, width).unwrap_err();
        let is_checksum = matches!(err, InitializerError::ChecksumMismatch { .. });
        prop_assert!(is_checksum);
    }

    #[test]
    fn checkpoint_fails_only_when_block_exceeds_area(
        height in 0u32..4096,
        width in 0u32..4096,
        active_width in 0u32..4096,
        active_height in 0u32..4096,
    ) {
        prop_assert_eq!(
            minimum_block_checkpoint(Some(height), Some(width), active_width, active_height),
            !(active_width < width || active_height < height)
        );
        prop_assert!(minimum_block_checkpoint(None, Some(width), active_width, active_height));
        prop_assert!(minimum_block_checkpoint(Some(height), None, active_width, active_height));
    }

    #[test]
    fn uniform_block_samples_its_color(
        pixel_width in 1usize..16,
        column in 0usize..3,
        row in 0usize..3,
        rgb in any::<[u8; 3]>(),
    ) {
        let [r, g, b] = rgb;
        let color = Rgb::new(r, g, b);
        let mut image = RgbImage::new(pixel_width * 3, pixel_width * 3, Rgb::new(!r, !g, !b));
        image.fill_rect(column * pixel_width, row * pixel_width, pixel_width, pixel_width, color);
        prop_assert_eq!(sample_block(&image, pixel_width, column, row).unwrap(), color);
    }
}
