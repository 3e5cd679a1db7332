use crate::result::Result;
use std::fs;
use std::path::Path;

/// End-of-central-directory record of a zip archive with no entries.
///
/// Signature `0x06054b50` (little-endian) followed by disk numbers, entry
/// counts, central directory size and offset, and comment length, all zero.
pub const EMPTY_ARCHIVE: [u8; 22] = [
    0x50, 0x4b, 0x05, 0x06, // signature
    0x00, 0x00, // number of this disk
    0x00, 0x00, // disk where central directory starts
    0x00, 0x00, // entries on this disk
    0x00, 0x00, // total entries
    0x00, 0x00, 0x00, 0x00, // central directory size
    0x00, 0x00, 0x00, 0x00, // central directory offset
    0x00, 0x00, // comment length
];

/// Write an empty zip archive to `path`, replacing any existing file
pub fn write_empty(path: &Path) -> Result<()> {
    fs::write(path, EMPTY_ARCHIVE)?;
    Ok(())
}
