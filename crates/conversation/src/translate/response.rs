use bytes::Bytes;
use http::header::CONTENT_TYPE;
use tracing::trace;

use crate::native::{NativeResponse, ResponseBody, find_header};
use crate::protocol::{MessageBody, ResponseMessage};

/// Translates a structured [`ResponseMessage`] into a [`NativeResponse`].
///
/// Status and headers are copied unchanged and in order; the status is not range checked. A
/// binary body is passed on as raw bytes. A text body is passed on as its UTF-8 bytes and, like
/// a native text response, gets `content-type: text/plain; charset=utf-8` appended when the
/// message has no content type of its own.
pub fn translate_response(message: ResponseMessage) -> NativeResponse {
    let (status, mut headers, body) = message.into_parts();

    let body = match body {
        MessageBody::Bytes(bytes) => ResponseBody::from(bytes),
        MessageBody::Text(text) => {
            if find_header(&headers, CONTENT_TYPE.as_str()).is_none() {
                headers.push((CONTENT_TYPE.as_str().to_string(), mime::TEXT_PLAIN_UTF_8.to_string()));
            }
            ResponseBody::from(Bytes::from(text))
        }
    };

    trace!(status, headers = headers.len(), body_size = body.len(), "translated response");

    NativeResponse::new(status, headers, body)
}
