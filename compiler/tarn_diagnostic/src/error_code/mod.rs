//! Error codes for method resolution diagnostics.
//!
//! The first digit names the phase: `E2xxx` for type errors, `E9xxx` for
//! internal compiler errors.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// No method with the given name applies to the receiver
    E2010,
    /// Multiple applicable methods with the same name
    E2011,
    /// Associated function called with method-call syntax
    E2012,
    /// Auto-dereferencing the receiver does not terminate
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E9001 => "E9001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
