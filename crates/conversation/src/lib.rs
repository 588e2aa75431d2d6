//! Adapts native HTTP messages to an immutable, structured message model and back.
//!
//! A transport hands over requests in its own mutable shape: a URL string, a method token,
//! a list of header pairs and a body stream that can only be read once. This crate turns that
//! shape into a [`RequestMessage`](protocol::RequestMessage) for application code, turns the
//! application's [`ResponseMessage`](protocol::ResponseMessage) back into a
//! [`NativeResponse`](native::NativeResponse), and owns the contract for reading a body:
//!
//! - a body handle is consumed at most once, every later read yields
//!   [`BodyError::AlreadyRead`](protocol::BodyError::AlreadyRead)
//! - a failed read is classified as a parse failure or a read failure, never masked
//! - form fields are returned sorted by key, whatever order the client sent them in
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use micro_conversation::native::NativeRequest;
//! use micro_conversation::protocol::{MessageBody, ResponseMessage};
//! use micro_conversation::read::read_json;
//! use micro_conversation::translate::{translate_request, translate_response};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let native = NativeRequest::new(
//!     "https://example.com/users?page=2",
//!     "POST",
//!     vec![("content-type".to_string(), "application/json".to_string())],
//!     Full::new(Bytes::from_static(br#"{"name":"zava"}"#)),
//! );
//!
//! let request = translate_request(&native)?;
//! assert_eq!(request.query(), Some("page=2"));
//!
//! let json = read_json(request.body()).await?;
//! assert_eq!(json["name"], "zava");
//!
//! let response = ResponseMessage::new(200, vec![], MessageBody::Text("created".into()));
//! let native_response = translate_response(response);
//! let _http_response = native_response.into_http()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the structured message model and the error types
//! - [`native`]: the transport-facing request, response and body handle
//! - [`translate`]: native ⇄ structured translation, synchronous
//! - [`read`]: the asynchronous, single-use body readers

pub mod native;
pub mod protocol;
pub mod read;
pub mod translate;

mod utils;
pub(crate) use utils::ensure;
