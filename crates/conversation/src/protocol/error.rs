use thiserror::Error;

/// Why reading a body failed.
///
/// The set is closed so handlers can map every case to a response: `ParseError` is the
/// client's fault, `ReadError` is the transport's, `AlreadyRead` is a bug in the handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    #[error("body has already been read")]
    AlreadyRead,

    #[error("invalid body: {0}")]
    ParseError(String),

    #[error("failed to read body: {0}")]
    ReadError(String),
}

impl BodyError {
    pub fn parse<S: ToString>(str: S) -> Self {
        Self::ParseError(str.to_string())
    }

    pub fn read<S: ToString>(str: S) -> Self {
        Self::ReadError(str.to_string())
    }

    /// Returns the diagnostic message, `None` for [`BodyError::AlreadyRead`].
    pub fn message(&self) -> Option<&str> {
        match self {
            BodyError::AlreadyRead => None,
            BodyError::ParseError(message) | BodyError::ReadError(message) => Some(message),
        }
    }
}

/// Marker error for a body stream that is polled again after it was drained.
///
/// A body implementation that can be reached through more than one handle yields this from
/// `poll_frame` instead of an ambiguous generic error; readers report it as
/// [`BodyError::AlreadyRead`], also when it is wrapped in an `io::Error` or an error's source
/// chain.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("body stream has already been consumed")]
pub struct BodyConsumed;

/// Failure to translate a native request.
///
/// The transport promises an absolute URL, so this means that contract was broken.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("invalid request url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl TranslateError {
    pub fn invalid_url<S: ToString>(url: S, source: url::ParseError) -> Self {
        Self::InvalidUrl { url: url.to_string(), source }
    }
}

/// Failure to turn a [`NativeResponse`](crate::native::NativeResponse) into an
/// `http::Response`.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("invalid status code: {source}")]
    InvalidStatus {
        #[from]
        source: http::status::InvalidStatusCode,
    },

    #[error("invalid header name: {source}")]
    InvalidHeaderName {
        #[from]
        source: http::header::InvalidHeaderName,
    },

    #[error("invalid header value: {source}")]
    InvalidHeaderValue {
        #[from]
        source: http::header::InvalidHeaderValue,
    },
}
