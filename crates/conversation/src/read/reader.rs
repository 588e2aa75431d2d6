use std::error::Error as StdError;
use std::io;

use bytes::Bytes;
use http_body::Body as HttpBody;
use http_body_util::{BodyExt, Collected, Limited};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::native::NativeBody;
use crate::protocol::{BodyConsumed, BodyError, BodyReadResult};
use crate::read::form::{self, FormPayload};

/// Error type a body stream must convert into.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Default maximum number of fields in a form body
const DEFAULT_MAX_FORM_PARTS: usize = 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads single-use bodies into typed values.
///
/// Every read takes the stream out of the [`NativeBody`] before touching it, so a handle is
/// consumed even when the read fails, and any later read returns [`BodyError::AlreadyRead`]
/// without doing I/O.
///
/// Failures are classified in this order:
/// 1. [`BodyError::AlreadyRead`]: the handle was consumed, or the stream reported
///    [`BodyConsumed`]
/// 2. [`BodyError::ParseError`]: the bytes do not form the requested payload
/// 3. [`BodyError::ReadError`]: anything else, including an exceeded size limit
#[derive(Debug, Clone)]
pub struct BodyReader {
    max_body_size: Option<usize>,
    max_form_parts: usize,
}

#[derive(Debug, Clone)]
pub struct BodyReaderBuilder {
    max_body_size: Option<usize>,
    max_form_parts: usize,
}

impl BodyReaderBuilder {
    fn new() -> Self {
        Self { max_body_size: None, max_form_parts: DEFAULT_MAX_FORM_PARTS }
    }

    /// Bodies longer than `limit` bytes fail with [`BodyError::ReadError`]. Unlimited by default.
    pub fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = Some(limit);
        self
    }

    /// Form bodies with more than `limit` fields fail with [`BodyError::ParseError`].
    pub fn max_form_parts(mut self, limit: usize) -> Self {
        self.max_form_parts = limit;
        self
    }

    pub fn build(self) -> BodyReader {
        BodyReader { max_body_size: self.max_body_size, max_form_parts: self.max_form_parts }
    }
}

impl Default for BodyReader {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BodyReader {
    pub fn builder() -> BodyReaderBuilder {
        BodyReaderBuilder::new()
    }

    /// Reads the body as UTF-8 text.
    ///
    /// A leading byte order mark is dropped and invalid sequences are replaced with `U+FFFD`,
    /// so decoding itself never fails.
    pub async fn read_text<B>(&self, body: &NativeBody<B>) -> BodyReadResult<String>
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let bytes = self.consume(body).await?;
        Ok(String::from_utf8_lossy(strip_bom(&bytes)).into_owned())
    }

    /// Reads the raw body bytes.
    pub async fn read_bytes<B>(&self, body: &NativeBody<B>) -> BodyReadResult<Bytes>
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        self.consume(body).await
    }

    /// Reads the body as a JSON value.
    pub async fn read_json<B>(&self, body: &NativeBody<B>) -> BodyReadResult<Value>
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        self.read_json_as(body).await
    }

    /// Reads the body as JSON and deserializes it into `T`.
    ///
    /// Syntax errors and values that do not fit `T` are both [`BodyError::ParseError`].
    pub async fn read_json_as<T, B>(&self, body: &NativeBody<B>) -> BodyReadResult<T>
    where
        T: DeserializeOwned,
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let bytes = self.consume(body).await?;
        serde_json::from_slice(strip_bom(&bytes)).map_err(|e| {
            debug!(cause = %e, "invalid json body");
            BodyError::parse(e)
        })
    }

    /// Reads the body as a form.
    ///
    /// `multipart/form-data` and `application/x-www-form-urlencoded` bodies are accepted, any
    /// other content type is a [`BodyError::ParseError`]. Fields with a filename become
    /// [`UploadedFile`](crate::read::UploadedFile)s, the rest become values; both lists come back
    /// sorted by key.
    pub async fn read_form<B>(&self, body: &NativeBody<B>) -> BodyReadResult<FormPayload>
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let bytes = self.consume(body).await?;
        form::decode(body.content_type(), &bytes, self.max_form_parts).inspect_err(|e| {
            debug!(cause = %e, content_type = body.content_type(), "invalid form body");
        })
    }

    /// Takes the stream out of the handle and buffers it completely.
    async fn consume<B>(&self, body: &NativeBody<B>) -> BodyReadResult<Bytes>
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let Some(stream) = body.take().await else {
            debug!("body has already been read");
            return Err(BodyError::AlreadyRead);
        };

        let collected: Result<Bytes, BoxError> = match self.max_body_size {
            Some(limit) => Limited::new(stream, limit).collect().await.map(Collected::to_bytes),
            None => stream.collect().await.map(Collected::to_bytes).map_err(Into::into),
        };

        collected.map_err(|e| {
            let error = classify(&*e);
            if error == BodyError::AlreadyRead {
                debug!(cause = %e, "body stream reported it was already consumed");
            } else {
                warn!(cause = %e, "failed to read body");
            }
            error
        })
    }
}

/// Maps a stream failure to [`BodyError::AlreadyRead`] when anything in its source chain is the
/// [`BodyConsumed`] marker, and to [`BodyError::ReadError`] otherwise.
fn classify(error: &(dyn StdError + 'static)) -> BodyError {
    let mut current = Some(error);
    while let Some(cause) = current {
        if is_consumed_signal(cause) {
            return BodyError::AlreadyRead;
        }
        current = cause.source();
    }

    BodyError::read(error)
}

fn is_consumed_signal(error: &(dyn StdError + 'static)) -> bool {
    if error.is::<BodyConsumed>() {
        return true;
    }

    // io::Error::source skips the wrapped error, so look inside explicitly
    error
        .downcast_ref::<io::Error>()
        .and_then(io::Error::get_ref)
        .is_some_and(|inner| inner.is::<BodyConsumed>())
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}
