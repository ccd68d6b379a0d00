use std::fs;
use std::path::{Path, PathBuf};

use chromaframe_core::headers::initializer::layout;
use chromaframe_core::{BitBuffer, payload_digest};
use sha2::{Digest, Sha256};

const STREAM_LABEL: &[u8] = b"chromaframe stream";
const PAYLOAD: &[u8] = b"chromaframe payload";
const FRAME_NUMBER: u32 = 7;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/fixtures");
    fs::create_dir_all(&root)
        .map_err(|err| format!("failed to create {}: {}", root.display(), err))?;
    write_initializer_fixtures(&root)?;
    write_frame_fixtures(&root)?;
    Ok(())
}

fn write_initializer_fixtures(root: &Path) -> Result<(), String> {
    write_fixture(root.join("initializer_v2.bin"), &initializer(2, 40, 30, 0))?;
    write_fixture(root.join("initializer_v3.bin"), &initializer(3, 40, 30, 37))?;
    write_fixture(root.join("initializer_palette37.bin"), &initializer(2, 40, 30, 37))?;

    let mut corrupted = initializer(2, 40, 30, 0);
    corrupted[10] ^= 0x01;
    write_fixture(root.join("initializer_bad_crc.bin"), &corrupted)?;
    Ok(())
}

fn write_frame_fixtures(root: &Path) -> Result<(), String> {
    let payload = BitBuffer::from_bytes(PAYLOAD.to_vec());
    let block_count = u32::try_from(payload.len()).map_err(|err| err.to_string())?;
    let header = frame_header(&payload, FRAME_NUMBER, block_count)?;
    write_fixture(root.join("payload.bin"), PAYLOAD)?;
    write_fixture(root.join("frame_header.bin"), &header)?;

    let mut corrupted = header;
    corrupted[65] ^= 0x01;
    write_fixture(root.join("frame_header_bad_crc.bin"), &corrupted)?;
    Ok(())
}

/// Initializer with a default palette ID in the last byte of the palette field.
fn initializer(version: u8, block_height: u16, block_width: u16, palette: u8) -> Vec<u8> {
    let mut bits = BitBuffer::new();
    bits.push_uint(u64::from(version), 4);
    bits.push_uint(u64::from(block_height), 16);
    bits.push_uint(u64::from(block_width), 16);
    bits.push_bytes(&[0; 31]);
    bits.push_uint(u64::from(palette), 8);
    debug_assert_eq!(bits.len(), layout::CHECKSUM_OFFSET);
    let crc = crc32fast::hash(bits.as_bytes());
    bits.push_uint(u64::from(crc), 32);
    bits.into_bytes()
}

fn frame_header(
    payload: &BitBuffer,
    frame_number: u32,
    block_count: u32,
) -> Result<Vec<u8>, String> {
    let frame_hash = hex::decode(payload_digest(payload)).map_err(|err| err.to_string())?;
    let mut bytes = Vec::with_capacity(76);
    bytes.extend_from_slice(&Sha256::digest(STREAM_LABEL));
    bytes.extend_from_slice(&frame_hash);
    bytes.extend_from_slice(&frame_number.to_be_bytes());
    bytes.extend_from_slice(&block_count.to_be_bytes());
    let crc = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&crc.to_be_bytes());
    Ok(bytes)
}

fn write_fixture(path: PathBuf, bytes: &[u8]) -> Result<(), String> {
    fs::write(&path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
