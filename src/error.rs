use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No route context is registered under the name '{name}'.")]
    ContextNotFound { name: String },

    #[error("No default route context has been set.")]
    NoDefaultContext,

    #[error("No page was given and the context '{context}' has no default page.")]
    NoPageName { context: String },

    /// The requested page has no template file. The page name is HTML-escaped
    /// before it is stored, so the message is safe to echo into a response body.
    #[error("Unknown page: {page}")]
    UnknownPage { page: String },

    /// A header/footer override file was requested directly as a page.
    #[error("This template does not support direct access")]
    DirectAccess,

    #[error("Failed to serialize route configuration. Original error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error must terminate the current request outright.
    ///
    /// Hard aborts are not recoverable within the request; the remaining
    /// variants are configuration errors surfaced to the calling code.
    pub fn is_hard_abort(&self) -> bool {
        matches!(self, Error::UnknownPage { .. } | Error::DirectAccess)
    }
}

/// Convenience type alias for Results with the router Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;
