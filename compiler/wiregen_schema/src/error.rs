//! Fatal errors.
//!
//! Everything recoverable is a warning in [`Diagnostics`](wiregen_diagnostic::Diagnostics);
//! the variants here stop the run before the next stage starts.

use wiregen_diagnostic::{Diagnostic, ErrorCode};

/// A condition that aborts extraction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum SchemaError {
    /// The source reader handed over no declarations at all.
    #[error("no exported definitions to process")]
    NoDeclarations,

    /// Inlining found the node it was about to copy to be the very node it
    /// was replacing. Valid input never produces this; it means the graph
    /// shares a handle between a declaration entry and a reference site.
    #[error("detected infinite recursion while inlining {name}")]
    InlineCycle { name: String },
}

impl SchemaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SchemaError::NoDeclarations => ErrorCode::E9001,
            SchemaError::InlineCycle { .. } => ErrorCode::E9002,
        }
    }

    /// Render as a diagnostic for hosts that report everything uniformly.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            SchemaError::NoDeclarations => diag,
            SchemaError::InlineCycle { name } => diag
                .with_subject(name.clone())
                .with_note("this is an internal invariant violation, not an input error"),
        }
    }
}
