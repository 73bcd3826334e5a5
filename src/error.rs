//! The TTM error taxonomy (`spec.md` §7).
//!
//! Every variant corresponds to one of the historical numeric codes from
//! `original_source/ttm.c`'s `ERR` enum, preserved via [`TtmError::code`] so
//! diagnostics and tests can cite the original code alongside the message.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TtmError {
    #[error("Dictionary Name or Character Class Name Not Found")]
    NoName,
    #[error("Primitives Not Allowed")]
    NoPrimitive,
    #[error("Too Few Parameters Given")]
    TooFewParams,
    #[error("Incorrect Format")]
    Format,
    #[error("Quotient Is Too Large")]
    Quotient,
    #[error("Decimal Integer Required")]
    Decimal,
    #[error("Too Many Digits")]
    TooManyDigits,
    #[error("Too Many Segment Marks")]
    TooManySegmentMarks,
    #[error("Dynamic Storage Overflow")]
    Memory,
    #[error("Only unsigned decimal integers")]
    Positive,
    #[error("An I/O Error Occurred")]
    Io,
    #[error("Stack overflow")]
    StackOverflow,
    #[error("Stack Underflow")]
    StackUnderflow,
    #[error("Buffer overflow")]
    BufferOverflow,
    #[error("Too many includes")]
    TooManyIncludes,
    #[error("Cannot read Include file")]
    Include,
    #[error("index out of legal range")]
    Range,
    #[error("Number of parameters greater than MAXARGS")]
    TooManyParams,
    #[error("Unexpected end of string")]
    UnexpectedEos,
    #[error("ASCII characters only")]
    Ascii,
    #[error("Illegal utf-8 character set")]
    Char8,
    #[error("Illegal utf-32 character set")]
    Utf32,
    #[error("Illegal #<ttm> command")]
    TtmCmd,
    #[error("Gettimeofday() failed")]
    Time,
    #[error("Unknown Error")]
    Other,

    /// Not a taxonomized failure: raised by `exit` to unwind the call
    /// stack without printing a diagnostic. Carries the process exit code.
    #[error("exit({0})")]
    Exit(i32),
}

impl TtmError {
    /// The historical numeric code, for parity with `original_source/ttm.c`.
    pub fn code(&self) -> i32 {
        match self {
            TtmError::NoName => 1,
            TtmError::NoPrimitive => 2,
            TtmError::TooFewParams => 3,
            TtmError::Format => 4,
            TtmError::Quotient => 5,
            TtmError::Decimal => 6,
            TtmError::TooManyDigits => 7,
            TtmError::TooManySegmentMarks => 8,
            TtmError::Memory => 9,
            TtmError::Positive => 20,
            TtmError::StackOverflow => 30,
            TtmError::StackUnderflow => 31,
            TtmError::BufferOverflow => 32,
            TtmError::TooManyIncludes => 33,
            TtmError::Include => 34,
            TtmError::Range => 35,
            TtmError::TooManyParams => 36,
            TtmError::UnexpectedEos => 37,
            TtmError::Ascii => 38,
            TtmError::Char8 => 39,
            TtmError::Utf32 => 40,
            TtmError::TtmCmd => 41,
            TtmError::Time => 42,
            TtmError::Io => 17,
            TtmError::Other => 99,
            TtmError::Exit(code) => *code,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, TtmError::Exit(_))
    }
}

pub type Result<T> = std::result::Result<T, TtmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_original_ttm_c() {
        assert_eq!(TtmError::NoName.code(), 1);
        assert_eq!(TtmError::TooFewParams.code(), 3);
        assert_eq!(TtmError::TooManySegmentMarks.code(), 8);
        assert_eq!(TtmError::TooManyParams.code(), 36);
        assert_eq!(TtmError::UnexpectedEos.code(), 37);
        assert_eq!(TtmError::Other.code(), 99);
    }

    #[test]
    fn exit_is_not_fatal_in_the_taxonomy_sense() {
        let e = TtmError::Exit(2);
        assert!(e.is_exit());
        assert_eq!(e.code(), 2);
    }
}
