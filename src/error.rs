use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("invalid path spec {spec:?}: {source}")]
    InvalidPathSpec {
        spec: String,
        #[source]
        source: regex::Error,
    },

    #[error("{name:?} parameter already exists")]
    DuplicateParam { name: String },

    #[error("`{method}` {msg}")]
    Logical { method: String, msg: &'static str },

    #[error("unsupported media type {0:?}")]
    UnsupportedMediaType(String),
}

impl RouterError {
    pub(crate) fn logical(method: impl Into<String>, msg: &'static str) -> Self {
        Self::Logical {
            method: method.into(),
            msg,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("`response.{accessor}()` no {accessor} found")]
    NotFound { accessor: &'static str },

    #[error("`response.engine()` no view engine named {0:?}")]
    EngineNotFound(String),

    #[error("`response.engine()` engine you choice is not compatible with router")]
    IncompatibleEngine,

    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },

    #[error("invalid cookie {name:?}")]
    InvalidCookie { name: String },

    #[error("view {0:?} resolves outside of the views directory")]
    UnsafePath(String),
}

/// An error carrying the HTTP status the response should end with.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: Option<String>,
    source: Option<BoxError>,
}

impl HttpError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            source: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Wraps an arbitrary error as a `500 Internal Server Error`,
    /// passing `HttpError`s through unchanged.
    pub fn from_error(err: BoxError) -> Self {
        match err.downcast::<HttpError>() {
            Ok(e) => *e,
            Err(e) => Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_source(e),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        match self.message {
            Some(ref m) => m,
            None => self.status.canonical_reason().unwrap_or("Unknown Error"),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message())
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}
