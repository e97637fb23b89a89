//! This library handles creating **BAR** archives used by *Age of Empires III*.
//!
//! # BAR Archive Format Documentation
//!
//! A BAR file stores many game files back to back, followed by a table describing them. BAR files are
//! identified with the `.bar` extension; this crate writes version 6 archives.
//!
//! ## File Structure
//!
//! A BAR file consists of a header, followed by the data of every entry and finally the entry table.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x4E505345 ("ESPN")                               |
//! | 0x0004         | Version                | 4 bytes: Fixed value 0x00000006                            |
//! | 0x0008         | Unknown                | 4 bytes: Fixed value 0x44332211                            |
//! | 0x000C         | Reserved               | 264 bytes: Zeroes                                          |
//! | 0x0114         | Checksum               | 4 bytes: Always zero, never validated                      |
//! | 0x0118         | File Count             | 4 bytes: Number of entries in the archive                  |
//! | 0x011C         | Reserved               | 4 bytes: Zero                                              |
//! | 0x0120         | Table Offset           | 8 bytes: Offset of the entry table from the file start     |
//! | 0x0128         | Name Hash              | 4 bytes: Hash of the upper-cased archive file name         |
//! | 0x012C         | Padding                | 4 bytes: Zero                                              |
//!
//! ### Data
//!
//! The bytes of every entry follow the 304 byte header unchanged and in table order. Entries are usually
//! [ALZ4](aoe_alz4) compressed XMB files, but any file may be stored.
//!
//! ### Entry Table
//!
//! The table starts with the root path of the archive (for example `Data\`) as a 4-byte UTF-16 character
//! count followed by the UTF-16 characters, and a 4-byte entry count. Every entry then has the following
//! structure:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Data Offset            | 8 bytes: Offset of the entry data from the file start   |
//! | 0x0008         | Size                   | 4 bytes: Stored size, or compressed payload size        |
//! | 0x000C         | Size 2                 | 4 bytes: Size of the entry data in the archive          |
//! | 0x0010         | Size 3                 | 4 bytes: Copy of Size 2                                 |
//! | 0x0014         | Name Length            | 4 bytes: Number of UTF-16 characters in the name        |
//! | 0x0018         | Name                   | (Name Length * 2) bytes: UTF-16 relative path           |
//! | ...            | Compressed             | 4 bytes: 1 if the entry is ALZ4 compressed, otherwise 0 |
//!
//! For an ALZ4 entry **Size** is the compressed payload size read from the ALZ4 header, while **Size 2**
//! and **Size 3** are the full length of the stored file. Uncompressed entries repeat their length in all
//! three fields.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.bar`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Text**: UTF-16LE, paths use `\` as separator
//!

pub mod error;
pub mod hash;
pub mod types;
pub mod write;

pub use hash::{archive_name_hash, super_fast_hash};
pub use types::{BarEntry, BarHeader};
pub use write::{create_archive, BarWriter, BarWriterOptions};
