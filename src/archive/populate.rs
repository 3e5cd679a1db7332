use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use std::fs::{File, OpenOptions};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Counts of entries written by [`populate`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PopulateSummary {
    pub files: usize,
    pub directories: usize,
}

/// Append every item below `source_dir` to the zip archive at `archive_path`.
///
/// The archive must already exist and be a valid zip (see
/// [`super::empty::write_empty`]). Returns once the central directory is
/// written and the file is closed.
pub fn populate(ctx: &Context, archive_path: &Path, source_dir: &Path) -> Result<PopulateSummary> {
    if !source_dir.is_dir() {
        return Err(Error::SourceNotFound(source_dir.to_path_buf()));
    }

    let file = OpenOptions::new().read(true).write(true).open(archive_path)?;
    let mut zip = ZipWriter::new_append(file)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = PopulateSummary::default();

    let walkdir = WalkDir::new(source_dir).follow_links(true).sort_by_file_name();
    for entry in walkdir {
        let entry = entry?;
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let name = entry_name(relative)?;

        #[cfg(unix)]
        let options = {
            use std::os::unix::fs::PermissionsExt;
            options.unix_permissions(entry.metadata()?.permissions().mode() & 0o777)
        };

        if entry.file_type().is_dir() {
            if ctx.verbose {
                println!("Adding {}/", name);
            }
            zip.add_directory(name, options)?;
            summary.directories += 1;
        } else {
            if ctx.verbose {
                println!("Adding {}", name);
            }
            zip.start_file(name, options)?;
            let mut f = File::open(path)?;
            std::io::copy(&mut f, &mut zip)?;
            summary.files += 1;
        }
    }

    zip.finish()?;
    Ok(summary)
}

/// Reopen the archive and check that it holds exactly `expected_files` files
pub fn verify(archive_path: &Path, expected_files: usize) -> Result<()> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;

    let mut found = 0;
    for index in 0..archive.len() {
        if !archive.by_index(index)?.is_dir() {
            found += 1;
        }
    }

    if found != expected_files {
        return Err(Error::IncompleteArchive {
            expected: expected_files,
            found,
        });
    }
    Ok(())
}

/// Archive entry name for a path relative to the source root, always `/`-separated.
///
/// Non-UTF-8 names are rejected rather than lossily converted, which could
/// map two different files to the same entry.
fn entry_name(relative: &Path) -> Result<String> {
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                Error::custom(format!(
                    "File name is not valid UTF-8 and cannot be archived: {}",
                    relative.display()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}
