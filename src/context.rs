use crate::result::Result;
use std::path::{Path, PathBuf};

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Enable verbose output (list every archived entry)
    pub verbose: bool,

    /// Directory all configured relative names are resolved against
    pub base_dir: PathBuf,
}

impl Context {
    pub fn new(base_dir: PathBuf, verbose: bool) -> Self {
        Self { verbose, base_dir }
    }

    /// Build a context rooted at `path`, or at the current directory when absent
    pub fn from_path(path: Option<&Path>, verbose: bool) -> Result<Self> {
        let base_dir = match path {
            Some(path) => std::path::absolute(path)?,
            None => std::env::current_dir()?,
        };
        Ok(Self::new(base_dir, verbose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_is_made_absolute() {
        let ctx = Context::from_path(Some(Path::new("project")), false).unwrap();
        assert!(ctx.base_dir.is_absolute());
        assert!(ctx.base_dir.ends_with("project"));
    }

    #[test]
    fn test_defaults_to_current_dir() {
        let ctx = Context::from_path(None, true).unwrap();
        assert_eq!(ctx.base_dir, std::env::current_dir().unwrap());
        assert!(ctx.verbose);
    }
}
