//! The error and warning taxonomy surfaced by every fallible operation.

use thiserror::Error;

/// Fatal failures. Every fallible entry point returns `Result<_, Error>`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("expected a string or MoraStr, found something else")]
    TypeMismatch,

    #[error("invalid character {ch:?} at offset {offset}")]
    InvalidCharacter { ch: char, offset: u32 },

    #[error("mora longer than three characters")]
    MoraTooLong,

    #[error("mora boundary does not match the preceding column")]
    IllFormedMoraString,

    #[error("replacement must not begin with a small kana")]
    IllFormedReplacement,

    #[error("transform changed the mora count")]
    MoraLengthInconsistency,

    #[error("prolonged sound mark has no preceding katakana to extend")]
    DanglingProlongedMark,

    #[error("string exceeds the maximum supported length")]
    TooLong,

    #[error("no match found")]
    NotFound,

    #[error("converter failed: {0}")]
    Converter(String),
}

/// Recoverable diagnostics: returned alongside a successful value rather
/// than aborting the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("string begins with a small kana, which cannot bind to a preceding mora")]
    LeadingSmallKana,
}
