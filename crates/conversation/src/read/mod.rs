//! Single-use body readers.
//!
//! A body handle can be read once. The first read takes the stream out of the
//! [`NativeBody`] and buffers it; every later read, through any reader and any clone of the
//! handle, returns [`BodyError::AlreadyRead`](crate::protocol::BodyError::AlreadyRead). A read
//! that fails still consumes the handle, there is no retry.
//!
//! The free functions use a default [`BodyReader`]; build one with [`BodyReader::builder`] to
//! limit body size or the number of form fields.

mod form;
mod multipart;
mod reader;

pub use form::FormPayload;
pub use form::UploadedFile;
pub use reader::BodyReader;
pub use reader::BodyReaderBuilder;
pub use reader::BoxError;

use bytes::Bytes;
use http_body::Body as HttpBody;
use serde_json::Value;

use crate::native::NativeBody;
use crate::protocol::BodyReadResult;

/// Reads the body as UTF-8 text, see [`BodyReader::read_text`].
pub async fn read_text<B>(body: &NativeBody<B>) -> BodyReadResult<String>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    BodyReader::default().read_text(body).await
}

/// Reads the raw body bytes, see [`BodyReader::read_bytes`].
pub async fn read_bytes<B>(body: &NativeBody<B>) -> BodyReadResult<Bytes>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    BodyReader::default().read_bytes(body).await
}

/// Reads the body as a JSON value, see [`BodyReader::read_json`].
pub async fn read_json<B>(body: &NativeBody<B>) -> BodyReadResult<Value>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    BodyReader::default().read_json(body).await
}

/// Reads the body as a form, see [`BodyReader::read_form`].
pub async fn read_form<B>(body: &NativeBody<B>) -> BodyReadResult<FormPayload>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    BodyReader::default().read_form(body).await
}
