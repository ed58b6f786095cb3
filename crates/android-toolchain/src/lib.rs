//! Android Toolchain
//!
//! Knows where the SDK and JDK programs live and how to read the SDK
//! manager's textual listings:
//! - SDK and build-tools layout
//! - JDK layout
//! - `list target` / `list avd` parsing
//! - Environment defaulting

pub mod env;
pub mod jdk;
pub mod listing;
pub mod sdk;

pub use env::ToolchainEnv;
pub use jdk::JavaHome;
pub use listing::{find_target, parse_targets, parse_virtual_devices, Target};
pub use sdk::{select_build_tools, AndroidSdk, BuildTools};
