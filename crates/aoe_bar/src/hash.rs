//! The SuperFastHash variant stored in BAR headers
//!
//! This is Paul Hsieh's SuperFastHash with two changes made by the game: the hash starts at zero
//! instead of the input length, and the final avalanche uses different shifts.

/// Hash `data` with the BAR flavour of SuperFastHash.
///
/// Empty input hashes to zero.
pub fn super_fast_hash(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }

    let mut hash: u32 = 0;

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        hash = hash.wrapping_add(u16::from_le_bytes([chunk[0], chunk[1]]) as u32);
        let tmp = ((u16::from_le_bytes([chunk[2], chunk[3]]) as u32) << 11) ^ hash;
        hash = (hash << 16) ^ tmp;
        hash = hash.wrapping_add(hash >> 11);
    }

    match *chunks.remainder() {
        [a, b, c] => {
            hash = hash.wrapping_add(u16::from_le_bytes([a, b]) as u32);
            hash ^= hash << 16;
            hash ^= (c as u32) << 18;
            hash = hash.wrapping_add(hash >> 11);
        }
        [a, b] => {
            hash = hash.wrapping_add(u16::from_le_bytes([a, b]) as u32);
            hash ^= hash << 11;
            hash = hash.wrapping_add(hash >> 17);
        }
        [a] => {
            hash = hash.wrapping_add(a as u32);
            hash ^= hash << 10;
            hash = hash.wrapping_add(hash >> 1);
        }
        _ => {}
    }

    hash ^= hash << 3;
    hash = hash.wrapping_add(hash >> 5);
    hash ^= hash << 2;
    hash = hash.wrapping_add(hash >> 15);
    hash ^= hash << 10;

    hash
}

/// Hash of an archive file name as stored in the BAR header.
///
/// The name is upper-cased before hashing its UTF-8 bytes, so `Data.bar` and `DATA.BAR` agree.
pub fn archive_name_hash(name: &str) -> u32 {
    super_fast_hash(name.to_uppercase().as_bytes())
}
