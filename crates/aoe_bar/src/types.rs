//! Base types for structure of BAR file.

use binrw::{BinRead, BinWrite};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};
use widestring::U16String;

#[cfg(feature = "serde")]
use serde::Serialize;

/// BAR file header
///
/// Defines the header of the BAR file which always starts with "ESPN" and then a version (in this case 6).
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(magic = b"ESPN", little)]
pub struct BarHeader {
    /// The archive format version
    pub version: u32,

    /// A constant with an unknown purpose
    pub unknown: u32,

    /// Checksum slot, the game never validates it and it is always written as zero
    #[brw(pad_before = 264)]
    pub checksum: u32,

    /// The number of entries stored in the file
    pub file_count: u32,

    /// Always zero
    pub reserved: u32,

    /// The offset from the beginning of the file where the entry table starts
    pub table_offset: i64,

    /// [`crate::archive_name_hash`] of the archive file name
    #[brw(pad_after = 4)]
    pub name_hash: u32,
}

impl BarHeader {
    /// Size of the serialized header, including the trailing padding
    pub const SIZE: usize = 304;

    /// The only version written by this crate
    pub const VERSION: u32 = 6;

    /// Value of [`BarHeader::unknown`] in every archive
    pub const UNKNOWN: u32 = 0x4433_2211;

    /// Create a header for an archive with `file_count` entries and its table at `table_offset`
    pub fn new(file_count: u32, table_offset: i64, name_hash: u32) -> Self {
        Self {
            file_count,
            table_offset,
            name_hash,
            ..Default::default()
        }
    }
}

impl Default for BarHeader {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            unknown: Self::UNKNOWN,
            checksum: 0,
            file_count: 0,
            reserved: 0,
            table_offset: Self::SIZE as i64,
            name_hash: 0,
        }
    }
}

/// BAR file entry
///
/// Describes one file stored in the archive. The three size fields are kept separately because the
/// game expects all of them, even though they only differ for compressed entries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BarEntry {
    /// Path relative to the archive root, using `\` as separator
    pub path: String,

    /// Offset of the entry data from the end of the header
    pub offset: i64,

    /// Size of the stored data, or the compressed payload size for ALZ4 entries
    #[cfg_attr(feature = "serde", serde(skip))]
    pub size: i32,

    /// Size of the stored data
    #[cfg_attr(feature = "serde", serde(rename = "size"))]
    pub size_dup1: i32,

    /// Size of the stored data
    #[cfg_attr(feature = "serde", serde(skip))]
    pub size_dup2: i32,

    /// Whether the stored data is ALZ4 compressed
    #[cfg_attr(feature = "serde", serde(rename = "compression"))]
    pub compressed: bool,
}

impl BarEntry {
    /// Offset of the entry data from the start of the archive
    pub fn absolute_offset(&self) -> i64 {
        BarHeader::SIZE as i64 + self.offset
    }

    /// Serialize the entry as it appears in the entry table
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i64::<LittleEndian>(self.absolute_offset())?;
        writer.write_i32::<LittleEndian>(self.size)?;
        writer.write_i32::<LittleEndian>(self.size_dup1)?;
        writer.write_i32::<LittleEndian>(self.size_dup2)?;
        write_utf16(writer, U16String::from_str(&self.path).as_slice())?;
        writer.write_u32::<LittleEndian>(self.compressed as u32)
    }
}

/// Write a UTF-16 character count followed by the UTF-16LE characters
pub(crate) fn write_utf16<W: Write>(writer: &mut W, units: &[u16]) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(units.len() as u32)?;
    for unit in units {
        writer.write_u16::<LittleEndian>(*unit)?;
    }
    Ok(())
}
