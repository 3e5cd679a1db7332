use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::Path;

/// Rename the finished archive to its distribution name.
///
/// Refuses to replace an existing file at `destination`.
pub fn finalize(archive_path: &Path, destination: &Path) -> Result<()> {
    if destination.exists() {
        return Err(Error::DestinationExists(destination.to_path_buf()));
    }
    fs::rename(archive_path, destination)?;
    Ok(())
}
