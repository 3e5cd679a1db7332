use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on waiting for a removed directory to disappear
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Remove a directory tree and wait until it is really gone.
///
/// Some filesystems report success before a pending delete completes, so the
/// path is polled until it no longer exists or `timeout` elapses.
pub fn remove_dir_settled(path: &Path, timeout: Duration) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    let deadline = Instant::now() + timeout;
    while path.exists() {
        if Instant::now() >= deadline {
            return Err(Error::SettleTimeout(path.to_path_buf()));
        }
        thread::sleep(SETTLE_POLL_INTERVAL);
    }

    Ok(())
}

/// Lexically resolve `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Canonicalize the longest existing prefix of `path` and append the rest
pub fn resolve_existing(path: &Path) -> Result<PathBuf> {
    let path = normalize(path);
    let mut remainder = Vec::new();
    let mut current = path.as_path();

    loop {
        match fs::canonicalize(current) {
            Ok(mut resolved) => {
                for part in remainder.iter().rev() {
                    resolved.push(part);
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (current.parent(), current.file_name()) else {
                    return Ok(path);
                };
                remainder.push(name.to_os_string());
                current = parent;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_dir_settled() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("nested").join("stale.txt"), "stale").unwrap();

        remove_dir_settled(&out, SETTLE_TIMEOUT).unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn test_remove_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_dir_settled(&dir.path().join("absent"), Duration::ZERO).unwrap();
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/work/./src")), Path::new("/work/src"));
        assert_eq!(normalize(Path::new("/work/out/../src/")), Path::new("/work/src"));
        assert_eq!(normalize(Path::new("/work/a/b/../../c")), Path::new("/work/c"));
        assert_eq!(normalize(Path::new("/work/.")), Path::new("/work"));
    }

    #[test]
    fn test_resolve_existing_keeps_missing_tail() {
        let dir = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();

        let resolved = resolve_existing(&dir.path().join("out").join("nested")).unwrap();

        assert_eq!(resolved, base.join("out").join("nested"));
    }

    #[test]
    fn test_ensure_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");

        ensure_dir(&out).unwrap();
        ensure_dir(&out).unwrap();

        assert!(out.is_dir());
    }
}
