use thiserror::Error;

/// Errors from the backend service boundary (transport plus service-level
/// failures). The stores never reinterpret these beyond the variant; the
/// backend's own message is carried through verbatim.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Deserialization(String),
}

/// Errors from session store operations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Session creation succeeded but no identity could be resolved.
    /// The store forces Unauthenticated rather than claim a session
    /// without a resolved identity.
    #[error("post-login identity fetch failed")]
    IdentityUnresolved,
}

/// Errors from chat repository operations.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A fetched document is missing a required field or carries an
    /// unparsable value. Always fatal for the enclosing call; the
    /// observable collection keeps its prior contents.
    #[error("invalid document data: missing or malformed '{0}'")]
    InvalidDocument(&'static str),

    #[error("conversation requires at least one member")]
    NoMembers,
}
