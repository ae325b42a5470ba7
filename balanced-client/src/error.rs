//! Error type for client operations.

use balanced_types::ErrorKind;

use crate::transport::Response;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered with something that is not a JSON document.
    #[error("{0}")]
    Balanced(String),

    #[error("{0}")]
    Resource(String),

    #[error("{0}")]
    NoResultFound(String),

    #[error("{0}")]
    MultipleResultsFound(String),

    /// The API reported a failure; see [`HttpError::kind`] for the category.
    #[error(transparent)]
    Http(Box<HttpError>),

    /// Failing status seen by the transport before the body was interpreted.
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// Taxonomy kind of this error, if it belongs to the API error tree.
    ///
    /// Transport failures and invalid URLs or headers have no kind.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Balanced(_) => Some(ErrorKind::Balanced),
            Error::Resource(_) => Some(ErrorKind::Resource),
            Error::NoResultFound(_) => Some(ErrorKind::NoResultFound),
            Error::MultipleResultsFound(_) => Some(ErrorKind::MultipleResultsFound),
            Error::Http(err) => Some(err.kind),
            Error::Status { .. } => Some(ErrorKind::Http),
            // a body labelled JSON that does not parse is still an unreadable response
            Error::Json(_) => Some(ErrorKind::Balanced),
            Error::Transport(_) | Error::InvalidUrl(_) | Error::InvalidHeader(_) => None,
        }
    }

    /// Returns true when this error's kind is `kind` or one of its descendants.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind().is_some_and(|k| k.is(kind))
    }

    /// The mapped API error, if this is one.
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Error::Http(Box::new(err))
    }
}

/// A failing API response decoded into its error fields.
#[derive(Debug, thiserror::Error)]
#[error("{description}")]
pub struct HttpError {
    pub kind: ErrorKind,
    pub status_code: u16,
    pub status: Option<String>,
    /// Human-readable message; the raw body when the API sent none.
    pub description: String,
    pub additional: Option<String>,
    pub category_code: Option<String>,
    pub redirect_uri: Option<String>,
    pub response: Response,
}
