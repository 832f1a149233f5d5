use thiserror::Error;

/// Errors returned by [`super::process`] (spec.md §4.5).
///
/// `QueryProcessor` is specified as a pure function with no dependency
/// calls, so the only way it fails is a malformed input the caller
/// should have rejected first; `Agent` treats this as programmer error
/// surfaced through the normal error chain rather than a distinct RPC
/// code.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query was empty after normalization (e.g. all punctuation).
    #[error("query has no usable search terms")]
    NoSearchTerms,

    /// The raw query string was empty or all whitespace (spec.md §4.7/§4.8).
    #[error("query must not be empty")]
    Empty,

    /// The raw query string exceeded the 1000-character limit (spec.md §4.7/§4.8).
    #[error("query exceeds the 1000 character limit")]
    TooLong,
}
