//! Build Configuration
//!
//! The declarative pipeline input. Every stage section is optional; a
//! section's presence is what requests the stage:
//! - `[compile]` target to build against
//! - `[package]` output archive name
//! - `[sign]` keystore and passwords
//! - `[install]` profile to deploy with
//! - `[[profiles]]` named emulator / device definitions

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Default configuration file name inside the project directory
pub const DEFAULT_CONFIG_FILE: &str = "androidbuild.toml";

/// Shell commands run at stage entry and exit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageHooks {
    #[serde(default)]
    pub before: Vec<String>,
    #[serde(default)]
    pub after: Vec<String>,
}

/// `[compile]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Requested platform target, matched against any target alias
    pub target: String,
    #[serde(flatten)]
    pub hooks: StageHooks,
}

/// `[package]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOptions {
    /// Base name of the produced archives
    pub name: String,
    #[serde(flatten)]
    pub hooks: StageHooks,
}

/// `[sign.keystore]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreOptions {
    /// Keystore file, relative to the project directory
    #[serde(default = "default_keystore_path")]
    pub path: PathBuf,
    pub company_name: String,
    pub organisational_unit: String,
    pub organisation: String,
    pub location: String,
    pub state: String,
    pub country: String,
    /// Certificate validity in days
    #[serde(default = "default_validity")]
    pub validity: u32,
    #[serde(default = "default_keyalg")]
    pub keyalg: String,
    #[serde(default = "default_keysize")]
    pub keysize: u32,
}

fn default_keystore_path() -> PathBuf { PathBuf::from("release.keystore") }
fn default_validity() -> u32 { 10000 }
fn default_keyalg() -> String { "RSA".to_string() }
fn default_keysize() -> u32 { 2048 }

impl KeystoreOptions {
    /// Distinguished name for the generated certificate
    pub fn distinguished_name(&self) -> String {
        format!(
            "CN={}, OU={}, O={}, L={}, ST={}, C={}",
            self.company_name,
            self.organisational_unit,
            self.organisation,
            self.location,
            self.state,
            self.country
        )
    }
}

/// `[sign]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOptions {
    pub keystore: KeystoreOptions,
    pub storepass: String,
    pub keypass: String,
    pub key_alias: String,
    #[serde(default = "default_sigalg")]
    pub sigalg: String,
    #[serde(default = "default_digestalg")]
    pub digestalg: String,
    #[serde(flatten)]
    pub hooks: StageHooks,
}

fn default_sigalg() -> String { "SHA1withRSA".to_string() }
fn default_digestalg() -> String { "SHA1".to_string() }

/// `[install]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    /// Name of the profile to deploy with
    pub profile: String,
    #[serde(flatten)]
    pub hooks: StageHooks,
}

/// Install profile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Emulator,
    Device,
}

/// `[[profiles]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProfileType,
    /// Target the emulator image is created for
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub sdcard: String,
    #[serde(default)]
    pub abi: String,
}

/// Complete build configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub compile: Option<CompileOptions>,
    pub package: Option<PackageOptions>,
    pub sign: Option<SignOptions>,
    pub install: Option<InstallOptions>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl BuildConfiguration {
    /// Parse a configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BuildConfiguration = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::Config(format!(
                "Cannot find file {}",
                path.display()
            )));
        }

        debug!("Loading build configuration from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Look up a profile definition by name
    pub fn find_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    fn validate(&self) -> Result<()> {
        if let Some(ref compile) = self.compile {
            if compile.target.trim().is_empty() {
                return Err(PipelineError::Config("compile.target is empty".into()));
            }
        }
        if let Some(ref package) = self.package {
            if package.name.trim().is_empty() {
                return Err(PipelineError::Config("package.name is empty".into()));
            }
        }
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(PipelineError::Config("profile without a name".into()));
            }
            if profile.kind == ProfileType::Emulator && profile.target.trim().is_empty() {
                return Err(PipelineError::Config(format!(
                    "emulator profile '{}' has no target",
                    profile.name
                )));
            }
        }
        Ok(())
    }
}
