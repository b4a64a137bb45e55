/// Deduplicated (package, target) table
pub(crate) mod registry;
/// Applied/available/not-applied bookkeeping
pub(crate) mod tracker;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::registry::HookRegistry;
pub use self::tracker::{HookSummary, HookTracker};

/// Identifies a single instrumentable location: a named function inside a
/// named package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HookIdentity {
    pub package: String,
    pub target: String,
}

impl HookIdentity {
    pub fn new(package: impl Into<String>, target: impl Into<String>) -> Self {
        HookIdentity {
            package: package.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for HookIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.package, self.target)
    }
}

/// Serialized view of a registry entry. The field names are part of the
/// JSON hook report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackedHook {
    pub pkg: String,
    pub target: String,
}

impl From<HookIdentity> for TrackedHook {
    fn from(identity: HookIdentity) -> Self {
        TrackedHook {
            pkg: identity.package,
            target: identity.target,
        }
    }
}

/// When a hook function runs relative to the function it hooks
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HookType {
    /// Runs before the original function with its arguments
    Before,
    /// Runs instead of the original function
    Replace,
    /// Runs after the original function with its return value
    After,
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookType::Before => "Before",
            HookType::Replace => "Replace",
            HookType::After => "After",
        };

        f.write_str(name)
    }
}

/// A hook some fuzz target asked for. Whether it actually gets installed is
/// up to the instrumentation, which reports back through [`HookTracker`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hook {
    pub hook_type: HookType,
    identity: HookIdentity,
    /// The hooked function returns a future/promise
    pub is_async: bool,
}

impl Hook {
    pub fn new(
        hook_type: HookType,
        package: impl Into<String>,
        target: impl Into<String>,
        is_async: bool,
    ) -> Self {
        Hook {
            hook_type,
            identity: HookIdentity::new(package, target),
            is_async,
        }
    }

    pub fn identity(&self) -> &HookIdentity {
        &self.identity
    }

    pub fn package(&self) -> &str {
        &self.identity.package
    }

    pub fn target(&self) -> &str {
        &self.identity.target
    }
}
