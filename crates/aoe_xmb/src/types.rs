//! Base types for structure of XMB file.

use binrw::{BinRead, BinWrite};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Tag written at the start of every node
pub const NODE_TAG: [u8; 2] = *b"XN";

/// Bytes of a length field and everything before it, excluded from the stored length
pub const LENGTH_PREFIX: usize = 6;

/// XMB file header
///
/// Defines the header of the XMB file which always starts with "X1", the file length and a fixed
/// "XR" sub-header. All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(magic = b"X1", little)]
pub struct XmbHeader {
    /// Size of the file minus the magic and this field
    pub length: u32,

    /// Always 4
    #[brw(magic = b"XR")]
    pub root_version: u32,

    /// Always 8
    pub tree_version: u32,
}

impl XmbHeader {
    /// Size of the serialized header
    pub const SIZE: usize = 16;

    /// Create a header storing `length`, the file size minus 6
    pub fn new(length: u32) -> Self {
        Self {
            length,
            root_version: 4,
            tree_version: 8,
        }
    }
}

/// Bytes used by a character count followed by `units` UTF-16 characters
pub(crate) fn utf16_size(units: usize) -> usize {
    4 + units * 2
}

/// Write a UTF-16 character count followed by the UTF-16LE characters
pub(crate) fn write_utf16<W: Write>(writer: &mut W, units: &[u16]) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(units.len() as u32)?;
    for unit in units {
        writer.write_u16::<LittleEndian>(*unit)?;
    }
    Ok(())
}
