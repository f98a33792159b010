//! Cumulative diagnostics channel for one extraction run.
//!
//! Every diagnostic pushed here is also logged through `tracing` at the
//! matching level, so a host that only installs a subscriber still sees
//! them. Nothing in the collector ever aborts: fatal conditions travel as
//! `Err` values instead.
//!
//! Unresolved-identifier warnings are reported once per name. A name can be
//! seen by the translator, then again by every inlining site; the first
//! report is the useful one.

use rustc_hash::FxHashSet;

use crate::{diagnostic, Diagnostic, ErrorCode, Severity};

/// Ordered collection of the warnings and notes produced by a run.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    /// Names already reported as unresolved.
    unresolved: FxHashSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => tracing::error!(code = %diag.code, "{}", diag.message),
            Severity::Warning => tracing::warn!(code = %diag.code, "{}", diag.message),
        }
        self.items.push(diag);
    }

    /// Report `name` as unresolved unless it already was.
    ///
    /// Returns `true` if a warning was recorded.
    pub fn unresolved_identifier(&mut self, name: &str) -> bool {
        if self.unresolved.contains(name) {
            return false;
        }
        self.unresolved.insert(name.to_owned());
        self.push(diagnostic::unresolved_identifier(name));
        true
    }

    /// Whether `name` has been reported as unresolved.
    pub fn is_reported_unresolved(&self, name: &str) -> bool {
        self.unresolved.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics carrying `code`, in report order.
    pub fn with_code(&self, code: ErrorCode) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
