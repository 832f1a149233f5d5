use thiserror::Error;

/// A specific key-grammar violation (spec.md §3/§8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A `<` opened before the previous `<...>` token closed.
    #[error("doubled angle bracket")]
    DoubledAngleBracket,
    /// A `<` was never closed by a `>`.
    #[error("unmatched '<'")]
    UnmatchedOpenBracket,
    /// A `>` appeared with no matching `<`.
    #[error("unmatched '>'")]
    UnmatchedCloseBracket,
    /// A `<>` token had no content.
    #[error("empty '<>' token")]
    EmptyToken,
    /// The key sequence contained a raw control character.
    #[error("control character not allowed")]
    ControlCharacter,
}
