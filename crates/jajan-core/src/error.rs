use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}

/// A candidate store could not be queried (connection, timeout, decode).
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct StoreError {
    context: String,
    #[source]
    source: BoxError,
}

impl StoreError {
    pub fn new(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("candidate store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl SearchError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SearchError::InvalidQuery {
            reason: reason.into(),
        }
    }
}
