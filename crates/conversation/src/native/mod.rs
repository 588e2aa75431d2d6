//! The transport-facing side of the conversion.
//!
//! A transport builds a [`NativeRequest`] per inbound message and receives a [`NativeResponse`]
//! back. Both carry headers as ordered pairs. The request body lives in a [`NativeBody`], a
//! shared single-use handle that the readers in [`crate::read`] consume.

mod body;
pub use body::NativeBody;
pub use body::ResponseBody;

mod request;
pub use request::NativeRequest;

mod response;
pub use response::NativeResponse;

/// Finds the first value of the header `name`, compared case-insensitively.
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
}
