//! Encoding and decoding of in-memory ALZ4 frames

use binrw::{BinRead, BinWrite};
use std::io::{Cursor, Read, Seek, Write};
use tracing::{instrument, trace};

use crate::compression::{BlockCompressor, Lz4Block};
use crate::error::{Error, Result};
use crate::types::{Alz4Header, ALZ4_MAGIC};

/// An LZ4 block never expands a byte of input into more than 255 bytes of output
const MAX_EXPANSION: usize = 255;

/// Returns true if the buffer starts with the ALZ4 magic.
///
/// Only the first four bytes are inspected, nothing is decompressed.
pub fn is_alz4(data: &[u8]) -> bool {
    data.get(..ALZ4_MAGIC.len()) == Some(&ALZ4_MAGIC[..])
}

/// Returns true if the next four bytes of the reader are the ALZ4 magic.
///
/// A reader that ends before four bytes is not an ALZ4 stream.
pub fn is_alz4_reader<R: Read>(mut reader: R) -> bool {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).is_ok() && magic == ALZ4_MAGIC
}

/// Read the stored compressed payload size from the first 12 bytes of a frame.
///
/// The payload itself is never read.
pub fn peek_compressed_size<R: Read>(mut reader: R) -> Result<u32> {
    let mut prefix = [0u8; Alz4Header::PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;

    let magic = [prefix[0], prefix[1], prefix[2], prefix[3]];
    if !magic.eq_ignore_ascii_case(&ALZ4_MAGIC) {
        return Err(Error::InvalidMagic(magic));
    }

    Ok(u32::from_le_bytes([prefix[8], prefix[9], prefix[10], prefix[11]]))
}

/// Wrap `data` into an ALZ4 frame using LZ4 block compression.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    encode_with(&Lz4Block, data)
}

/// Wrap `data` into an ALZ4 frame using the given compressor.
#[instrument(skip_all, fields(size = data.len()), err)]
pub fn encode_with<C: BlockCompressor>(compressor: &C, data: &[u8]) -> Result<Vec<u8>> {
    let uncompressed_size = u32::try_from(data.len()).map_err(|_| Error::TooLarge(data.len()))?;

    let payload = compressor.compress(data);
    let compressed_size =
        u32::try_from(payload.len()).map_err(|_| Error::TooLarge(payload.len()))?;
    trace!(uncompressed_size, compressed_size, "compressed block");

    let mut frame = Cursor::new(Vec::with_capacity(Alz4Header::SIZE + payload.len()));
    Alz4Header::new(uncompressed_size, compressed_size).write(&mut frame)?;
    frame.write_all(&payload)?;

    Ok(frame.into_inner())
}

/// Unwrap an in-memory ALZ4 frame.
pub fn decode(frame: &[u8]) -> Result<Vec<u8>> {
    decode_reader(Cursor::new(frame))
}

/// Unwrap an ALZ4 frame read from `reader`.
pub fn decode_reader<R: Read + Seek>(reader: R) -> Result<Vec<u8>> {
    decode_reader_with(&Lz4Block, reader)
}

/// Unwrap an ALZ4 frame read from `reader` using the given compressor.
///
/// Exactly `compressed_size` bytes are consumed after the header, and they must expand to exactly
/// `uncompressed_size` bytes.
#[instrument(skip_all, err)]
pub fn decode_reader_with<C: BlockCompressor, R: Read + Seek>(
    compressor: &C,
    mut reader: R,
) -> Result<Vec<u8>> {
    let header = Alz4Header::read(&mut reader)?;
    if !header.has_valid_magic() {
        return Err(Error::InvalidMagic(header.magic));
    }

    let declared = header.compressed_size as usize;
    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(declared as u64)
        .read_to_end(&mut payload)?;
    if payload.len() != declared {
        return Err(Error::TruncatedPayload {
            expected: declared,
            actual: payload.len(),
        });
    }

    let expected = header.uncompressed_size as usize;
    if expected == 0 {
        return Ok(Vec::new());
    }
    if expected > payload.len().saturating_mul(MAX_EXPANSION) {
        return Err(Error::ImplausibleSize {
            compressed: payload.len(),
            uncompressed: expected,
        });
    }

    let mut output = vec![0u8; expected];
    let actual = compressor.decompress(&payload, &mut output)?;
    if actual != expected {
        return Err(Error::SizeMismatch { expected, actual });
    }

    Ok(output)
}
