//! Synchronous translation between native and structured messages.
//!
//! - [`translate_request`]: [`NativeRequest`](crate::native::NativeRequest) →
//!   [`RequestMessage`](crate::protocol::RequestMessage), body left unread
//! - [`translate_response`]: [`ResponseMessage`](crate::protocol::ResponseMessage) →
//!   [`NativeResponse`](crate::native::NativeResponse)

mod request;
pub use request::translate_request;

mod response;
pub use response::translate_response;
