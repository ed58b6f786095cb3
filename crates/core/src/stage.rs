//! Pipeline stages

use std::fmt;

/// The fixed stages of a build, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Compile,
    Package,
    Sign,
    Install,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Package => "package",
            Stage::Sign => "sign",
            Stage::Install => "install",
        }
    }

    pub fn all() -> &'static [Stage] {
        &[Stage::Compile, Stage::Package, Stage::Sign, Stage::Install]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a hook list runs at stage entry or exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Before,
    After,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::Before => "before",
            HookPhase::After => "after",
        }
    }
}
