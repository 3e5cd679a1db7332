//! The packaging run, one step per function so the caller can report progress
//! between them.

use crate::archive::populate::{self, PopulateSummary};
use crate::archive::{empty, finalize};
use crate::context::Context;
use crate::error::Error;
use crate::manifest::PackPaths;
use crate::result::Result;
use crate::utils;
use std::fs;
use std::path::Path;

/// Fail early when there is nothing to package or the output would clobber
/// the sources, before the output is touched
pub fn check_source(paths: &PackPaths) -> Result<()> {
    if !paths.source_dir.is_dir() {
        return Err(Error::SourceNotFound(paths.source_dir.clone()));
    }
    paths.check_overlap()
}

/// Delete the output directory if present. Returns whether anything was removed.
pub fn clean_output(paths: &PackPaths) -> Result<bool> {
    if !paths.output_dir.exists() {
        return Ok(false);
    }
    utils::remove_dir_settled(&paths.output_dir, utils::SETTLE_TIMEOUT)?;
    Ok(true)
}

/// Create the output directory and the empty archive inside it
pub fn initialize(paths: &PackPaths) -> Result<()> {
    utils::ensure_dir(&paths.output_dir)?;
    empty::write_empty(&paths.zip_path)
}

/// Copy the source tree into the archive and confirm every file landed.
///
/// On failure the partial archive is removed so no output file is left behind.
pub fn pack(ctx: &Context, paths: &PackPaths) -> Result<PopulateSummary> {
    let result = populate::populate(ctx, &paths.zip_path, &paths.source_dir)
        .and_then(|summary| populate::verify(&paths.zip_path, summary.files).map(|()| summary));

    if result.is_err()
        && let Err(e) = discard_partial(&paths.zip_path)
    {
        // The packing error is the one reported; a console failure here is not.
        cliclack::log::warning(format!(
            "Could not remove partial archive {}: {}",
            paths.zip_path.display(),
            e
        ))
        .ok();
    }
    result
}

/// Remove a half-written archive; an already missing file is fine
fn discard_partial(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Rename the archive to its final extension
pub fn finish(paths: &PackPaths) -> Result<()> {
    finalize::finalize(&paths.zip_path, &paths.final_path)
}
