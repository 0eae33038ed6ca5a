use thiserror::Error;

/// Result type for propsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for propsearch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration was loaded but holds an illegal combination of fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// The search backend rejected or failed a request
    #[error("Backend error: {0}")]
    Backend(String),

    /// A requested backend object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Creates a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
