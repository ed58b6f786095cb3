//! Project Layout
//!
//! The on-disk shape of a buildable project:
//!
//! ```text
//! <root>/
//!   AndroidManifest.xml
//!   src/                 sources (plus generated R.java)
//!   res/{drawable,layout,values}/
//!   lib/                 third-party .jar archives
//!   obj/                 compiled classes      (generated)
//!   bin/                 dex + archives        (generated)
//!   doc/                                       (generated)
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Manifest file name at the project root
pub const MANIFEST_FILE: &str = "AndroidManifest.xml";

/// Directories a project must provide
pub const REQUIRED_DIRS: &[&str] = &["src", "res", "res/drawable", "res/layout", "res/values", "lib"];

/// Directories the build creates on demand
pub const GENERATED_DIRS: &[&str] = &["obj", "bin", "doc"];

/// Paths of a project rooted at one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn res_dir(&self) -> PathBuf {
        self.root.join("res")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn obj_dir(&self) -> PathBuf {
        self.root.join("obj")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Bytecode archive produced by the compile stage
    pub fn classes_dex(&self) -> PathBuf {
        self.bin_dir().join("classes.dex")
    }

    /// Unsigned archive produced by the package stage
    pub fn unsigned_apk(&self, name: &str) -> PathBuf {
        self.bin_dir().join(format!("{}.unsigned.apk", name))
    }

    /// Resolve a project-relative path
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Required directories that do not exist
    pub fn missing_dirs(&self) -> Vec<&'static str> {
        REQUIRED_DIRS
            .iter()
            .copied()
            .filter(|dir| !self.root.join(dir).is_dir())
            .collect()
    }

    /// Check the project is buildable: required directories and the
    /// manifest exist. Generated directories are created.
    pub fn verify(&self) -> Result<()> {
        if let Some(missing) = self.missing_dirs().first() {
            return Err(PipelineError::MissingDirectory(missing.to_string()));
        }

        self.ensure_generated_dirs()?;

        if !self.manifest().is_file() {
            return Err(PipelineError::Config(format!(
                "Could not find {} in the build directory",
                MANIFEST_FILE
            )));
        }

        Ok(())
    }

    /// Create every required directory that is missing
    pub fn create_required_dirs(&self) -> Result<()> {
        for dir in self.missing_dirs() {
            info!("Creating {}", dir);
            std::fs::create_dir_all(self.root.join(dir))?;
        }
        Ok(())
    }

    pub fn ensure_generated_dirs(&self) -> Result<()> {
        for dir in GENERATED_DIRS {
            let path = self.root.join(dir);
            if !path.exists() {
                debug!("Creating {:?}", path);
                std::fs::create_dir_all(&path)?;
            }
        }
        Ok(())
    }
}
