use std::io;
use thiserror::Error;

/// Fatal failure of one load attempt.
///
/// Every variant names the construct that violated the format's expectations
/// so the message can be shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Missing required section: {0}")]
    MissingSection(String),
    #[error("Unsupported simulation cell on line {line}: {reason}")]
    UnsupportedCell { line: usize, reason: String },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("No {0} found in input")]
    Empty(&'static str),
    #[error("Unable to determine the file format of '{0}'")]
    UnknownFormat(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("Invalid integer for {field} (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Non-finite value for {field} (value: '{value}')")]
    NonFiniteCoordinate { field: &'static str, value: String },
    #[error("Atom count must be a positive integer (value: '{value}')")]
    InvalidAtomCount { value: String },
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Expected {expected} atom lines, found {found} before end of input")]
    TruncatedAtoms { expected: usize, found: usize },
    #[error("Expected {expected} atom lines, found {found} before the next ITEM section")]
    UnexpectedItem { expected: usize, found: usize },
    #[error("Missing required column '{0}' in ATOMS header")]
    MissingColumn(&'static str),
    #[error("ATOMS header has no complete coordinate triple (x y z, xu yu zu, xs ys zs or xsu ysu zsu)")]
    MissingCoordinates,
    #[error("BOX BOUNDS line must contain a lower and an upper bound")]
    InvalidBoxBounds,
    #[error("Type id must be a positive integer (value: '{value}')")]
    InvalidTypeId { value: String },
}

impl ParseError {
    pub(crate) fn at(line: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { line, kind }
    }

    /// Returns `true` when the input simply ended inside an atom block.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::Parse {
                kind: ParseErrorKind::TruncatedAtoms { .. },
                ..
            }
        )
    }
}
