use std::fmt;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single reported problem.
///
/// `subject` names the declaration, field, identifier or directive the
/// problem is about, so callers can filter without parsing `message`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub subject: Option<String>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            subject: None,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

/// A declaration whose shape the translator cannot represent.
pub fn unsupported_declaration(name: &str, shape: &str) -> Diagnostic {
    Diagnostic::warning(ErrorCode::W1001)
        .with_message(format!("unable to parse {name}"))
        .with_subject(name)
        .with_note(format!("unsupported shape `{shape}`"))
}

/// A struct field dropped during translation.
pub fn ignored_field(owner: &str, index: usize, reason: impl Into<String>) -> Diagnostic {
    Diagnostic::warning(ErrorCode::W1002)
        .with_message(format!("ignored struct field {index} of {owner}"))
        .with_subject(owner)
        .with_note(reason)
}

/// A reference to a name that is not a primitive or a declaration.
pub fn unresolved_identifier(name: &str) -> Diagnostic {
    Diagnostic::warning(ErrorCode::W1003)
        .with_message(format!("unresolved identifier: {name}"))
        .with_subject(name)
}

/// An extension tag on a field whose shape cannot carry one.
pub fn extension_mismatch(field: &str, shape: &str) -> Diagnostic {
    Diagnostic::warning(ErrorCode::W1004)
        .with_message(format!("field {field:?} couldn't be cast as an extension"))
        .with_subject(field)
        .with_note(format!("field shape is `{shape}`"))
}

/// A directive that was skipped.
pub fn directive_failure(directive: &str, reason: impl fmt::Display) -> Diagnostic {
    Diagnostic::warning(ErrorCode::W2001)
        .with_message(format!("error applying directive: {reason}"))
        .with_subject(directive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_includes_code_and_notes() {
        let diag = unsupported_declaration("Handler", "func()");
        assert_eq!(
            diag.to_string(),
            "warning [W1001]: unable to parse Handler\n  = note: unsupported shape `func()`"
        );
    }

    #[test]
    fn helpers_set_subject() {
        assert_eq!(
            unresolved_identifier("Missing").subject.as_deref(),
            Some("Missing")
        );
        assert_eq!(
            directive_failure("tuple Nope", "no such type Nope").subject.as_deref(),
            Some("tuple Nope")
        );
        assert!(!extension_mismatch("Data", "[]int").is_error());
    }
}
