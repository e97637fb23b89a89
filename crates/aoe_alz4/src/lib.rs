//! This library handles reading from and creating **ALZ4** files used by *Age of Empires III*.
//!
//! # ALZ4 Container Format Documentation
//!
//! ALZ4 is a thin wrapper around a single raw LZ4 block. The game uses it for most of the files stored
//! inside of BAR archives, typically XMB trees.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x347A6C61 ("alz4")                               |
//! | 0x0004         | Uncompressed Size      | 4 bytes: Size of the payload once decompressed             |
//! | 0x0008         | Compressed Size        | 4 bytes: Size of the compressed payload                    |
//! | 0x000C         | Version                | 4 bytes: Fixed value 0x00000001                            |
//! | 0x0010         | Payload                | (Compressed Size) bytes: raw LZ4 block                     |
//!
//! ### Header
//!
//! - **Magic Number**: The ASCII text `alz4`. Readers compare it case-insensitively.
//! - **Uncompressed Size**: Exact number of bytes the payload expands to.
//! - **Compressed Size**: Exact number of payload bytes following the header.
//! - **Version**: Always written as `1`, ignored when reading.
//!
//! The first 12 bytes are enough to learn the stored payload size, which is what BAR archives record
//! for compressed entries (see [`fs::compressed_size_of`]).
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression**: LZ4 block format, without the LZ4 frame wrapper or a size prefix
//!

pub mod compression;
pub mod error;
pub mod frame;
pub mod fs;
pub mod types;

pub use compression::{BlockCompressor, Lz4Block};
pub use frame::{decode, encode, is_alz4, peek_compressed_size};
pub use types::Alz4Header;
