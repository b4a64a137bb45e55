use std::io::{self, Write};

use crate::hooks::{Hook, HookRegistry, HookTracker};

const HOOK_PREFIX: &str = "DEBUG: [Hook]";

/// Writes the line-oriented hook diagnostics.
///
/// The line formats are consumed by people diffing instrumentation runs, so
/// they must not change shape.
pub struct DiagnosticReporter<W: Write> {
    out: W,
}

impl DiagnosticReporter<io::Stderr> {
    pub fn stderr() -> Self {
        DiagnosticReporter { out: io::stderr() }
    }
}

impl<W: Write> DiagnosticReporter<W> {
    pub fn new(out: W) -> Self {
        DiagnosticReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Emits the summary: not-applied first since that's what usually needs
    /// fixing, then applied, then available.
    pub fn summary(&mut self, tracker: &HookTracker) -> io::Result<()> {
        writeln!(self.out, "{HOOK_PREFIX} Summary:")?;
        self.section(
            "Not applied",
            "not applied:",
            tracker.not_applied_registry(),
        )?;
        self.section("Applied", "applied:    ", tracker.applied_registry())?;
        self.section("Available", "available:  ", tracker.available_registry())?;

        self.out.flush()
    }

    fn section(&mut self, title: &str, label: &str, registry: &HookRegistry) -> io::Result<()> {
        writeln!(self.out, "{HOOK_PREFIX}    {title}: {}", registry.len())?;
        for (pkg, target) in registry.iter() {
            writeln!(self.out, "{HOOK_PREFIX} {label} {pkg} -> {target}")?;
        }

        Ok(())
    }

    /// Emits the one-line notice for a hook that was just installed
    pub fn applied_hook(&mut self, hook: &Hook) -> io::Result<()> {
        writeln!(
            self.out,
            "DEBUG: Applied {}-hook in {}#{}",
            hook.hook_type,
            hook.package(),
            hook.target()
        )
    }
}
