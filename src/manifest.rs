use crate::archive;
use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tcxpack.toml";

pub const DEFAULT_SOURCE: &str = "src";
pub const DEFAULT_OUTPUT: &str = "out";
pub const DEFAULT_NAME: &str = "VideoRecorder";

/// On-disk form of the config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// The three names that drive a packaging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub source: String,
    pub output: String,
    pub name: String,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            name: DEFAULT_NAME.to_string(),
        }
    }
}

/// Absolute paths derived from a [`Manifest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPaths {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub zip_path: PathBuf,
    pub final_path: PathBuf,
}

impl Manifest {
    /// Load the config file if present and layer it over the defaults.
    ///
    /// An explicitly requested config file must exist and is resolved against
    /// the current directory; the default one is optional and looked up in the
    /// context's base directory.
    pub fn load(ctx: &Context, config_path: Option<&Path>) -> Result<Self> {
        let mut manifest = Manifest::default();

        let config = match config_path {
            Some(path) => {
                let path = std::path::absolute(path)?;
                if !path.is_file() {
                    return Err(Error::InvalidManifest(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Some(Self::read_config(&path)?)
            }
            None => {
                let path = ctx.base_dir.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Some(Self::read_config(&path)?)
                } else {
                    None
                }
            }
        };

        if let Some(config) = config {
            manifest.apply(config.source, config.output, config.name);
        }

        Ok(manifest)
    }

    fn read_config(path: &Path) -> Result<PackConfig> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Replace any of the three names that are given
    pub fn apply(&mut self, source: Option<String>, output: Option<String>, name: Option<String>) {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(name) = name {
            self.name = name;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(Error::InvalidManifest("source directory is empty".to_string()));
        }
        if self.output.trim().is_empty() {
            return Err(Error::InvalidManifest("output directory is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidManifest("output name is empty".to_string()));
        }
        if self.name.contains(['/', '\\']) {
            return Err(Error::InvalidManifest(format!(
                "output name must not contain path separators: {}",
                self.name
            )));
        }

        Ok(())
    }

    /// Resolve the names against the context's base directory
    pub fn paths(&self, ctx: &Context) -> PackPaths {
        let source_dir = utils::normalize(&ctx.base_dir.join(&self.source));
        let output_dir = utils::normalize(&ctx.base_dir.join(&self.output));
        let zip_path = output_dir.join(format!("{}.zip", self.name));
        let final_path = output_dir.join(format!("{}.{}", self.name, archive::EXTENSION));

        PackPaths {
            source_dir,
            output_dir,
            zip_path,
            final_path,
        }
    }
}

impl PackPaths {
    /// The output directory must not be, contain, or lie inside the source directory.
    ///
    /// Checked on the normalized paths and again with symlinks resolved.
    pub fn check_overlap(&self) -> Result<()> {
        let candidates = [
            (self.source_dir.clone(), self.output_dir.clone()),
            (
                utils::resolve_existing(&self.source_dir)?,
                utils::resolve_existing(&self.output_dir)?,
            ),
        ];

        for (source, output) in candidates {
            if source.starts_with(&output) {
                return Err(Error::InvalidManifest(format!(
                    "source directory {} lies inside output directory {}, which is deleted on every run",
                    self.source_dir.display(),
                    self.output_dir.display()
                )));
            }
            if output.starts_with(&source) {
                return Err(Error::InvalidManifest(format!(
                    "output directory {} lies inside source directory {}",
                    self.output_dir.display(),
                    self.source_dir.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let manifest = Manifest::load(&ctx, None).unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.name, "VideoRecorder");
    }

    #[test]
    fn test_default_config_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "source = \"scripts\"\nname = \"Recorder\"\n",
        )
        .unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let manifest = Manifest::load(&ctx, None).unwrap();
        assert_eq!(manifest.source, "scripts");
        assert_eq!(manifest.output, DEFAULT_OUTPUT);
        assert_eq!(manifest.name, "Recorder");
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let err = Manifest::load(&ctx, Some(Path::new("nope.toml"))).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest(_)));
    }

    #[test]
    fn test_explicit_config_is_relative_to_current_dir() {
        // Tests run from the package root, where Cargo.toml is not a valid config
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let err = Manifest::load(&ctx, Some(Path::new("Cargo.toml"))).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pack.toml"), "extension = \"zip\"\n").unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let err = Manifest::load(&ctx, Some(&dir.path().join("pack.toml"))).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut manifest = Manifest::default();
        manifest.apply(None, Some("dist".to_string()), None);
        assert_eq!(manifest.source, DEFAULT_SOURCE);
        assert_eq!(manifest.output, "dist");
        assert_eq!(manifest.name, DEFAULT_NAME);
    }

    #[test]
    fn test_paths() {
        let ctx = Context::new(PathBuf::from("/work"), false);
        let paths = Manifest::default().paths(&ctx);

        assert_eq!(paths.source_dir, Path::new("/work/src"));
        assert_eq!(paths.output_dir, Path::new("/work/out"));
        assert_eq!(paths.zip_path, Path::new("/work/out/VideoRecorder.zip"));
        assert_eq!(paths.final_path, Path::new("/work/out/VideoRecorder.tcx"));
    }

    #[test]
    fn test_validate() {
        assert!(Manifest::default().validate().is_ok());

        let mut manifest = Manifest::default();
        manifest.name = "a/b".to_string();
        assert!(manifest.validate().is_err());

        let mut manifest = Manifest::default();
        manifest.name = "  ".to_string();
        assert!(manifest.validate().is_err());
    }

    fn overlap_for(root: &Path, output: &str) -> Result<()> {
        let ctx = Context::new(root.to_path_buf(), false);
        let mut manifest = Manifest::default();
        manifest.output = output.to_string();
        manifest.paths(&ctx).check_overlap()
    }

    #[test]
    fn test_overlap_is_checked_on_resolved_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        let absolute_src = root.join("src").to_string_lossy().into_owned();

        for output in ["src", "./src", "src/", "src/out", "./src/../src/out", ".", "..", "../proj/src"] {
            let err = overlap_for(&root, output).unwrap_err();
            assert!(matches!(err, Error::InvalidManifest(_)), "{output} was accepted");
        }
        assert!(overlap_for(&root, &absolute_src).is_err());

        assert!(overlap_for(&root, "out").is_ok());
        assert!(overlap_for(&root, "./out").is_ok());
        assert!(overlap_for(&root, "../dist").is_ok());
        assert!(overlap_for(&root, "src-out").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_overlap_through_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        std::os::unix::fs::symlink(root.join("src"), root.join("link")).unwrap();

        assert!(overlap_for(&root, "link").is_err());
        assert!(overlap_for(&root, "link/out").is_err());
    }

    #[test]
    fn test_paths_are_normalized() {
        let ctx = Context::new(PathBuf::from("/work"), false);
        let mut manifest = Manifest::default();
        manifest.source = "./scripts/../src".to_string();
        manifest.output = "build/./out".to_string();

        let paths = manifest.paths(&ctx);
        assert_eq!(paths.source_dir, Path::new("/work/src"));
        assert_eq!(paths.output_dir, Path::new("/work/build/out"));
    }
}
