//! Error codes for all diagnostics the runtime can emit.

use std::fmt;

/// Error codes for all runtime diagnostics.
///
/// Format: E#### where the first digit indicates the family:
/// - E1xxx: syntax errors, recovered from by the parser
/// - E9xxx: grammar or engine defects, fatal to the parse
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax errors
    /// Input did not match any of the expected alternatives
    E1001,
    /// Input matched only alternatives that were explicitly unwanted
    E1002,
    /// Input left over after the root rule finished
    E1003,

    // Engine errors
    /// Section exited at a different level than it was entered at
    E9001,
    /// Recursion ceiling reached
    E9002,
    /// A loop or recovery step made no progress
    E9003,
    /// Positive predicate opened inside a negative predicate
    E9004,
    /// A hook level committed a kind without a done marker
    E9005,
}

impl ErrorCode {
    /// All error code variants, for exhaustive iteration.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::E9003,
        ErrorCode::E9004,
        ErrorCode::E9005,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
            ErrorCode::E9004 => "E9004",
            ErrorCode::E9005 => "E9005",
        }
    }

    /// Check if this is a syntax error (E1xxx range).
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003)
    }

    /// Fatal codes abort the parse instead of producing an error node.
    pub fn is_fatal(&self) -> bool {
        !self.is_syntax_error()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    /// Parse an error code string like `"E9002"`. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}
