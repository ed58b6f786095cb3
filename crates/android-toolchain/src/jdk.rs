//! JDK Layout
//!
//! Locates the Java programs used to compile sources and to create and
//! apply signing keys.

use std::path::{Path, PathBuf};

/// A JDK installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaHome {
    root: PathBuf,
}

impl JavaHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bin(&self, name: &str) -> PathBuf {
        if cfg!(windows) {
            self.root.join("bin").join(format!("{}.exe", name))
        } else {
            self.root.join("bin").join(name)
        }
    }

    /// Source compiler
    pub fn javac(&self) -> PathBuf {
        self.bin("javac")
    }

    /// Key generator
    pub fn keytool(&self) -> PathBuf {
        self.bin("keytool")
    }

    /// Archive signer
    pub fn jarsigner(&self) -> PathBuf {
        self.bin("jarsigner")
    }

    /// Whether this looks like a JDK rather than a bare JRE
    pub fn has_compiler(&self) -> bool {
        self.javac().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_tool_paths() {
        let java = JavaHome::new("/usr/lib/jvm/java-8");
        assert_eq!(java.javac(), PathBuf::from("/usr/lib/jvm/java-8/bin/javac"));
        assert_eq!(java.keytool(), PathBuf::from("/usr/lib/jvm/java-8/bin/keytool"));
        assert_eq!(java.jarsigner(), PathBuf::from("/usr/lib/jvm/java-8/bin/jarsigner"));
    }

    #[test]
    fn test_has_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let java = JavaHome::new(dir.path());
        assert!(!java.has_compiler());

        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(java.javac(), "").unwrap();
        assert!(java.has_compiler());
    }
}
