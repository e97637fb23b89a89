//! Helpers for ALZ4 files on disk

use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};
use tracing::{instrument, warn};

use crate::error::Result;
use crate::frame::{decode_reader, encode, is_alz4_reader, peek_compressed_size};

/// Compress `data` and write the frame to `path`.
///
/// If writing fails after the file was created the file is removed again, and the original
/// error is returned even if the removal fails.
#[instrument(skip_all, fields(path = %path.as_ref().display(), size = data.len()), err)]
pub fn write_file(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let frame = encode(data)?;

    let result: Result<()> = File::create(path)
        .and_then(|mut file| {
            file.write_all(&frame)?;
            file.flush()
        })
        .map_err(Into::into);

    if result.is_err() && path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("unable to remove partial file {}: {}", path.display(), e);
        }
    }

    result
}

/// Read and decompress the ALZ4 file at `path`.
#[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    decode_reader(BufReader::new(File::open(path)?))
}

/// Returns true if the file at `path` starts with the ALZ4 magic.
pub fn is_alz4_file(path: impl AsRef<Path>) -> Result<bool> {
    Ok(is_alz4_reader(File::open(path)?))
}

/// Read the compressed payload size stored in the header of the ALZ4 file at `path`.
pub fn compressed_size_of(path: impl AsRef<Path>) -> Result<u32> {
    peek_compressed_size(File::open(path)?)
}
