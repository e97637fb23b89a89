//! Block compression and decompression handling.

use crate::error::Result;

/// A compressor for a single, self-contained block of bytes.
///
/// The frame only stores the two sizes next to the block, so the compressor must not add its own
/// size prefix or framing.
pub trait BlockCompressor {
    /// Compress the whole input into a new block
    fn compress(&self, input: &[u8]) -> Vec<u8>;

    /// Decompress a block into `output`, returning the number of bytes produced
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize>;
}

/// Raw LZ4 block compression, as used by the game
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Lz4Block;

impl BlockCompressor for Lz4Block {
    fn compress(&self, input: &[u8]) -> Vec<u8> {
        lz4_flex::block::compress(input)
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        Ok(lz4_flex::block::decompress_into(input, output)?)
    }
}
