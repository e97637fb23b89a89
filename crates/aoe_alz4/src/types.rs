//! Base types for structure of ALZ4 file.

use binrw::{BinRead, BinWrite};

/// Magic bytes at the start of every frame
pub const ALZ4_MAGIC: [u8; 4] = *b"alz4";

/// ALZ4 frame header
///
/// The magic is kept as a plain field instead of a `binrw` magic so that readers can apply the
/// case-insensitive comparison the game uses.
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct Alz4Header {
    /// Always `alz4` when written by this crate
    pub magic: [u8; 4],

    /// The size of the payload after decompression
    pub uncompressed_size: u32,

    /// The size of the payload stored after the header
    pub compressed_size: u32,

    /// The version of the container
    pub version: u32,
}

impl Alz4Header {
    /// Size of the serialized header
    pub const SIZE: usize = 16;

    /// Number of leading bytes needed to learn both sizes
    pub const PREFIX_SIZE: usize = 12;

    /// Version written into new frames
    pub const VERSION: u32 = 1;

    /// Create the header of a freshly compressed frame
    pub fn new(uncompressed_size: u32, compressed_size: u32) -> Self {
        Self {
            magic: ALZ4_MAGIC,
            uncompressed_size,
            compressed_size,
            version: Self::VERSION,
        }
    }

    /// Whether the magic matches, ignoring ASCII case
    pub fn has_valid_magic(&self) -> bool {
        self.magic.eq_ignore_ascii_case(&ALZ4_MAGIC)
    }
}

impl Default for Alz4Header {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::Alz4Header;

    #[test]
    fn write_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x61, 0x6C, 0x7A, 0x34,
            0x0B, 0x00, 0x00, 0x00,
            0x0C, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
        ];

        let mut actual = Vec::new();
        Alz4Header::new(11, 12).write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_uppercase_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x41, 0x4C, 0x5A, 0x34,
            0x00, 0x01, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
        ]);

        let header = Alz4Header::read(&mut input)?;
        assert!(header.has_valid_magic());
        assert_eq!(header.uncompressed_size, 256);
        assert_eq!(header.compressed_size, 32);

        Ok(())
    }

    #[test]
    fn reject_other_magic() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x6C, 0x33, 0x33, 0x74,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
        ]);

        assert!(!Alz4Header::read(&mut input)?.has_valid_magic());

        Ok(())
    }
}
