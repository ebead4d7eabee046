use std::fmt;

/// Reject codes for a parse, one per distinct failure path in the scanner.
///
/// Parsing stops at the first error. The arena may hold nodes from the
/// aborted attempt; callers reset it before parsing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Exponent accumulator overflowed while reading a number.
    BadNumber,
    /// Unterminated string, bare control byte, or invalid `\u` escape.
    BadString,
    /// A bare identifier was not exactly `null`, `true` or `false`.
    BadIdentifier,
    /// The root value is not an object or array.
    BadRoot,
    /// Nesting exceeded the fixed parse depth.
    StackOverflow,
    /// A closing bracket arrived with no open frame.
    StackUnderflow,
    /// Wrong closing bracket for the open frame, or a dangling comma.
    MismatchBracket,
    /// Expected `"` for an object key or `:` after one.
    UnexpectedCharacter,
    /// End of buffer or an unrecognized byte in value position.
    BreakingBad,
    /// The arena could not produce another node.
    OutOfMemory,
}

impl Error {
    pub fn as_str(self) -> &'static str {
        match self {
            Error::BadNumber => "number exponent overflow",
            Error::BadString => "unterminated string or bad escape",
            Error::BadIdentifier => "identifier is not null, true or false",
            Error::BadRoot => "root value must be an object or array",
            Error::StackOverflow => "nesting exceeds maximum depth",
            Error::StackUnderflow => "closing bracket with no open scope",
            Error::MismatchBracket => "mismatched bracket or dangling comma",
            Error::UnexpectedCharacter => "expected a key string or colon",
            Error::BreakingBad => "unexpected byte in value position",
            Error::OutOfMemory => "arena allocation failed",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_display_matches_as_str() {
        assert_eq!(Error::BadRoot.to_string(), Error::BadRoot.as_str());
        assert_eq!(
            Error::MismatchBracket.to_string(),
            "mismatched bracket or dangling comma"
        );
    }
}
