use std::fmt;

/// Codes for every diagnostic the schema engine reports.
///
/// Format: a letter for the severity class and four digits whose first digit
/// names the stage:
/// - W1xxx: Translation warnings (declarations and fields dropped)
/// - W2xxx: Directive warnings
/// - E9xxx: Fatal structural errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Translation (W1xxx)
    /// Declaration shape not supported; declaration dropped
    W1001,
    /// Struct field shape not supported; field dropped
    W1002,
    /// Identifier is neither a primitive alias nor a known declaration
    W1003,
    /// Extension tag on a field that is not a primitive
    W1004,

    // Directives (W2xxx)
    /// Directive rejected its arguments or target; directive skipped
    W2001,

    // Fatal (E9xxx)
    /// No declarations were supplied
    E9001,
    /// Inlining would substitute a node into itself
    E9002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::W1001 => "W1001",
            ErrorCode::W1002 => "W1002",
            ErrorCode::W1003 => "W1003",
            ErrorCode::W1004 => "W1004",
            ErrorCode::W2001 => "W2001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
