/// Errors produced by the backend SDK surface.
///
/// The adapter layer never wraps or reclassifies these; whatever value the
/// backend reports is what callers see. `Clone` and `PartialEq` exist so that
/// forwarded errors can be compared deep-equal against the backend-produced
/// original.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("resource not found: {resource} ({id})")]
    NotFound { resource: &'static str, id: String },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("document decode failed: {0}")]
    Decode(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

pub type BackendResult<T> = Result<T, BackendError>;
