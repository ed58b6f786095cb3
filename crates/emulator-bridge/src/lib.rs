//! Android Emulator Bridge
//!
//! Manages Android Virtual Devices and deploys archives through ADB.

pub mod adb;
pub mod avd;

pub use adb::{AdbClient, DeployTarget};
pub use avd::AvdManager;
