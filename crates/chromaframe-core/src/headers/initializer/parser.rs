use std::sync::Arc;

use crate::bits::BitCursor;
use crate::config::DecoderConfig;
use crate::geometry::BlockGeometry;
use crate::headers::common::checksum::header_crc32;
use crate::palette::{
    CustomPaletteLookup, DefaultPalettes, Palette, PaletteId, resolve_header_palette,
};

use super::error::InitializerError;
use super::reader::InitializerReader;

/// Verified stream initializer, carried forward for every frame.
#[derive(Debug, Clone)]
pub struct StreamInitializer {
    pub protocol_version: u8,
    pub geometry: BlockGeometry,
    pub palette_id: PaletteId,
    pub palette: Arc<Palette>,
}

/// Decode and verify the stream initializer.
///
/// Checks run in a fixed order and stop at the first failure: checksum,
/// protocol version, geometry against `expected`, palette resolution. An
/// unsupported protocol never reaches palette resolution.
///
/// # Errors
/// Every `InitializerError` is fatal for the stream.
pub fn decode_initializer<C: CustomPaletteLookup + ?Sized>(
    cursor: &mut BitCursor<'_>,
    expected: BlockGeometry,
    config: &DecoderConfig,
    custom: &C,
    defaults: &DefaultPalettes,
) -> Result<StreamInitializer, InitializerError> {
    tracing::debug!("decoding stream initializer");
    let mut reader = InitializerReader::new(cursor);
    reader.require_layout()?;

    reader.rewind()?;
    let (region, expected_crc) = reader.read_checksum_region()?;
    let computed_crc = header_crc32(&region);
    if computed_crc != expected_crc {
        tracing::warn!(
            expected = expected_crc,
            computed = computed_crc,
            "initializer checksum mismatch"
        );
        return Err(InitializerError::ChecksumMismatch {
            expected: expected_crc,
            computed: computed_crc,
        });
    }

    reader.rewind()?;
    let protocol_version = reader.read_protocol_version()?;
    if !config.supports(protocol_version) {
        tracing::warn!(
            version = protocol_version,
            "protocol version not supported by this reader"
        );
        return Err(InitializerError::UnsupportedProtocol {
            version: protocol_version,
            supported: config.supported_protocols.iter().copied().collect(),
        });
    }

    let geometry = reader.read_geometry()?;
    if geometry != expected {
        tracing::warn!(
            expected_height = expected.block_height,
            expected_width = expected.block_width,
            actual_height = geometry.block_height,
            actual_width = geometry.block_width,
            "initializer geometry disagrees with lock-on"
        );
        return Err(InitializerError::GeometryMismatch {
            expected_height: expected.block_height,
            expected_width: expected.block_width,
            actual_height: geometry.block_height,
            actual_width: geometry.block_width,
        });
    }

    let palette_id = reader.read_palette_id()?;
    let palette = resolve_header_palette(&palette_id, custom, defaults)?;

    tracing::debug!(
        version = protocol_version,
        palette = %palette_id,
        "stream initializer verified"
    );
    Ok(StreamInitializer {
        protocol_version,
        geometry,
        palette_id,
        palette,
    })
}
