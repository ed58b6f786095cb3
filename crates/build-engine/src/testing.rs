//! Shared fixtures for stage tests

use std::fs;
use tempfile::TempDir;

use droidpipe_android_toolchain::{AndroidSdk, JavaHome};
use droidpipe_core::{BuildConfiguration, ProjectLayout};

use crate::context::PipelineContext;

pub const TARGET_LISTING: &str = r#"Available Android targets:
----------
id: 1 or "android-16"
     Name: Android 4.1.2
     Type: Platform
     API level: 16
     Revision: 4
     Skins: HVGA, QVGA, WVGA800 (default)
----------
id: 2 or "android-17"
     Name: Android 4.2.2
     Type: Platform
     API level: 17
     Revision: 2
     Skins: HVGA, QVGA, WVGA800 (default)
"#;

pub const AVD_LISTING: &str = r#"Available Android Virtual Devices:
    Name: existing
    Path: /home/dev/.android/avd/existing.avd
  Target: Android 4.2.2 (API level 17)
"#;

/// Every stage requested; deploys to `emu1`
pub const FULL_CONFIG: &str = r#"
[compile]
target = "android-17"

[package]
name = "HelloAndroid"

[sign]
storepass = "storepass"
keypass = "keypass"
key_alias = "release"

[sign.keystore]
company_name = "Example"
organisational_unit = "Mobile"
organisation = "Example Ltd"
location = "London"
state = "London"
country = "GB"

[install]
profile = "emu1"

[[profiles]]
name = "emu1"
type = "emulator"
target = "android-17"
sdcard = "64M"
abi = "armeabi"

[[profiles]]
name = "phone"
type = "device"
"#;

pub fn full_config() -> BuildConfiguration {
    BuildConfiguration::from_toml_str(FULL_CONFIG).unwrap()
}

/// A verified project with two sources and one library jar, an SDK with
/// build-tools 17.0.0 and a JDK root, all inside one temp dir
pub fn fixture() -> (TempDir, PipelineContext) {
    let dir = tempfile::tempdir().unwrap();

    let project = ProjectLayout::new(dir.path().join("app"));
    project.create_required_dirs().unwrap();
    fs::write(project.manifest(), "<manifest package=\"com.example\"/>").unwrap();

    let pkg = project.src_dir().join("com/example");
    fs::create_dir_all(pkg.join("util")).unwrap();
    fs::write(pkg.join("Hello.java"), "package com.example;\nclass Hello {}\n").unwrap();
    fs::write(pkg.join("util/World.java"), "package com.example.util;\nclass World {}\n").unwrap();

    fs::write(project.lib_dir().join("support.jar"), "").unwrap();
    fs::write(project.lib_dir().join("readme.txt"), "").unwrap();
    project.verify().unwrap();

    let sdk = AndroidSdk::new(dir.path().join("sdk"));
    fs::create_dir_all(sdk.build_tools_dir().join("17.0.0")).unwrap();

    let java = JavaHome::new(dir.path().join("jdk"));

    let ctx = PipelineContext::new(project, sdk, java);
    (dir, ctx)
}
