use thiserror::Error;

/// Errors surfaced by configuration validation and the generate pipeline.
///
/// The three validation variants render the exact field-attributed strings
/// that config-driven callers (e.g. CLI layers) match on.
#[derive(Error, Debug)]
pub enum EmbedFnError {
    /// A required field was absent at full validation.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A present field failed its type/range predicate.
    #[error("{0} is invalid")]
    InvalidField(&'static str),

    /// An update supplied a value for a field that is fixed after creation.
    #[error("Updating {0} is not allowed")]
    ImmutableField(&'static str),

    /// The embedding service answered with a non-success HTTP status.
    #[error("embedding service error: {status} {status_text}")]
    RemoteService { status: u16, status_text: String },

    /// The request could not be sent or the response body could not be read.
    #[error("embedding request failed: {0}")]
    Transport(String),

    /// A success response carried the wrong number of vectors for its batch.
    #[error("embedding count mismatch: expected {expected}, got {got}")]
    CountMismatch { expected: usize, got: usize },

    /// Vector generation was attempted before any configuration was set.
    #[error("no embedding configuration set")]
    Unconfigured,
}
