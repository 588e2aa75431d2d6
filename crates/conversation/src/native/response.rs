use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Response, StatusCode};

use crate::native::{NativeBody, ResponseBody, find_header};
use crate::protocol::{ConvertError, Headers};

/// An outbound response ready for the transport.
#[derive(Debug)]
pub struct NativeResponse {
    status: u16,
    headers: Headers,
    body: ResponseBody,
}

impl NativeResponse {
    pub fn new(status: u16, headers: Headers, body: ResponseBody) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Converts into an `http::Response`, appending headers in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] for a status outside `100..=999` or a header name or value
    /// that is not valid HTTP.
    pub fn into_http(self) -> Result<Response<ResponseBody>, ConvertError> {
        let status = StatusCode::from_u16(self.status)?;

        let mut response = Response::new(self.body);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.reserve(self.headers.len());
        for (name, value) in &self.headers {
            headers.append(HeaderName::from_bytes(name.as_bytes())?, HeaderValue::from_str(value)?);
        }

        Ok(response)
    }

    /// Turns the body into a single-use handle, so the readers in [`crate::read`] can consume
    /// it.
    pub fn into_body(self) -> NativeBody<ResponseBody> {
        let content_type = find_header(&self.headers, CONTENT_TYPE.as_str()).map(str::to_string);
        NativeBody::new(self.body, content_type)
    }
}
