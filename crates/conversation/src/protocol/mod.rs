//! The structured HTTP message model.
//!
//! These types are what application code sees. They are immutable once built: every field is
//! read through an accessor and headers are kept as an ordered list of pairs, so duplicates and
//! their relative order survive translation in both directions.
//!
//! - [`RequestMessage`]: a translated inbound request holding an unread body handle
//! - [`ResponseMessage`]: an outbound response with a text or binary [`MessageBody`]
//! - [`Method`]: a permissive HTTP method that never fails to parse
//! - [`BodyError`]: the closed set of body read failures

mod method;
pub use method::Method;

mod request;
pub use request::RequestMessage;
pub use request::Scheme;

mod response;
pub use response::MessageBody;
pub use response::ResponseMessage;

mod error;
pub use error::BodyConsumed;
pub use error::BodyError;
pub use error::ConvertError;
pub use error::TranslateError;

/// Outcome of a body read.
pub type BodyReadResult<T> = Result<T, BodyError>;

/// An ordered list of `(name, value)` header pairs.
pub type Headers = Vec<(String, String)>;
