//! Project initialisation for droidpipe
//!
//! Lays out a buildable project: the required and generated directories,
//! a template manifest, a string resource file and a starter build
//! configuration. Existing files are never overwritten.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::{debug, info};

use droidpipe_core::{ProjectLayout, DEFAULT_CONFIG_FILE};

const MANIFEST_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android"
      package="com.example.test"
      android:versionCode="1"
      android:versionName="1.0">

    <uses-permission android:name="android.permission.INTERNET"/>

    <uses-sdk android:minSdkVersion="2"/>

    <application android:label="@string/myApplicationName">
        <activity android:name="com.example.test.HelloAndroid"
                  android:label="@string/myApplicationName">
            <intent-filter>
                <action android:name="android.intent.action.MAIN" />
                <category android:name="android.intent.category.LAUNCHER" />
            </intent-filter>
        </activity>
    </application>

</manifest>
"#;

const STRINGS_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="myApplicationName">HelloAndroid</string>
</resources>
"#;

const CONFIG_TEMPLATE: &str = r#"# droidpipe build configuration
#
# Each section requests a stage. A stage only runs when every earlier
# stage is configured too: package needs compile, sign needs package,
# install needs sign.

[compile]
target = "android-17"
# before = ["echo compiling"]
# after = []

[package]
name = "HelloAndroid"

# [sign]
# storepass = "changeit"
# keypass = "changeit"
# key_alias = "release"
#
# [sign.keystore]
# path = "release.keystore"
# company_name = "Example"
# organisational_unit = "Mobile"
# organisation = "Example Ltd"
# location = "London"
# state = "London"
# country = "GB"

# [install]
# profile = "emu1"

# [[profiles]]
# name = "emu1"
# type = "emulator"
# target = "android-17"
# sdcard = "64M"
# abi = "armeabi"
"#;

/// Files written by [`ProjectInitializer::init`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub created_dirs: Vec<String>,
    pub written_files: Vec<PathBuf>,
}

/// Scaffolds project directories
pub struct ProjectInitializer {
    config_filename: String,
}

impl ProjectInitializer {
    pub fn new() -> Self {
        Self {
            config_filename: DEFAULT_CONFIG_FILE.to_string(),
        }
    }

    /// Use a different build configuration file name
    pub fn with_config_file(mut self, name: impl Into<String>) -> Self {
        self.config_filename = name.into();
        self
    }

    /// Initialise `project_dir`, creating it if needed
    pub fn init(&self, project_dir: &Path) -> Result<InitReport> {
        info!("Initialising project: {:?}", project_dir);

        std::fs::create_dir_all(project_dir)
            .with_context(|| format!("Failed to create {:?}", project_dir))?;

        let layout = ProjectLayout::new(project_dir);
        let mut report = InitReport {
            created_dirs: layout.missing_dirs().iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        };

        layout
            .create_required_dirs()
            .context("Failed to create project directories")?;
        layout
            .ensure_generated_dirs()
            .context("Failed to create output directories")?;

        let files = [
            (layout.manifest(), MANIFEST_TEMPLATE),
            (layout.res_dir().join("values").join("strings.xml"), STRINGS_TEMPLATE),
            (project_dir.join(&self.config_filename), CONFIG_TEMPLATE),
        ];

        for (path, contents) in files {
            if write_if_absent(&path, contents)? {
                report.written_files.push(path);
            }
        }

        info!("Successfully initialised the required build directories");
        Ok(report)
    }
}

impl Default for ProjectInitializer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_if_absent(path: &Path, contents: &str) -> Result<bool> {
    if path.exists() {
        debug!("Keeping existing {:?}", path);
        return Ok(false);
    }

    std::fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    info!("Created {:?}", path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidpipe_core::BuildConfiguration;

    #[test]
    fn test_init_creates_buildable_layout() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("app");

        let report = ProjectInitializer::new().init(&project).unwrap();

        assert_eq!(report.created_dirs.len(), 6);
        assert_eq!(report.written_files.len(), 3);
        ProjectLayout::new(&project).verify().unwrap();
        assert!(project.join("res/values/strings.xml").is_file());
    }

    #[test]
    fn test_init_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AndroidManifest.xml"), "<manifest/>").unwrap();

        let first = ProjectInitializer::new().init(dir.path()).unwrap();
        assert_eq!(first.written_files.len(), 2);

        let second = ProjectInitializer::new().init(dir.path()).unwrap();
        assert!(second.created_dirs.is_empty());
        assert!(second.written_files.is_empty());

        let manifest = std::fs::read_to_string(dir.path().join("AndroidManifest.xml")).unwrap();
        assert_eq!(manifest, "<manifest/>");
    }

    #[test]
    fn test_starter_configuration_loads() {
        let dir = tempfile::tempdir().unwrap();
        ProjectInitializer::new()
            .with_config_file("build.toml")
            .init(dir.path())
            .unwrap();

        let config = BuildConfiguration::load(&dir.path().join("build.toml")).unwrap();
        assert_eq!(config.compile.unwrap().target, "android-17");
        assert_eq!(config.package.unwrap().name, "HelloAndroid");
        assert!(config.sign.is_none());
        assert!(config.install.is_none());
    }
}
