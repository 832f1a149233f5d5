use thiserror::Error;

/// Errors returned while loading or validating [`super::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value for {field}: {value}")]
    ParseError {
        /// The env var name.
        field: &'static str,
        /// The unparsable value.
        value: String,
    },

    /// A parsed config value violates a cross-field invariant.
    #[error("invalid config field {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: &'static str,
        /// Why it is invalid.
        reason: String,
    },
}
