//! The structured response message.

use bytes::Bytes;

use crate::protocol::Headers;

/// Body of a [`ResponseMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Bytes(Bytes),
}

impl MessageBody {
    pub fn len(&self) -> usize {
        match self {
            MessageBody::Text(text) => text.len(),
            MessageBody::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for MessageBody {
    fn from(value: String) -> Self {
        MessageBody::Text(value)
    }
}

impl From<&str> for MessageBody {
    fn from(value: &str) -> Self {
        MessageBody::Text(value.to_string())
    }
}

impl From<Bytes> for MessageBody {
    fn from(value: Bytes) -> Self {
        MessageBody::Bytes(value)
    }
}

impl From<Vec<u8>> for MessageBody {
    fn from(value: Vec<u8>) -> Self {
        MessageBody::Bytes(Bytes::from(value))
    }
}

/// An immutable, structured HTTP response produced by application code.
///
/// The status is kept as a raw integer; range checks happen only when the response is
/// emitted through [`NativeResponse::into_http`](crate::native::NativeResponse::into_http).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMessage {
    status: u16,
    headers: Headers,
    body: MessageBody,
}

impl ResponseMessage {
    pub fn new(status: u16, headers: Headers, body: MessageBody) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn into_parts(self) -> (u16, Headers, MessageBody) {
        (self.status, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_conversions() {
        assert_eq!(MessageBody::from("hi"), MessageBody::Text("hi".to_string()));
        assert_eq!(MessageBody::from("hi".to_string()), MessageBody::Text("hi".to_string()));
    }

    #[test]
    fn binary_conversions() {
        assert_eq!(MessageBody::from(vec![1u8, 2, 3]), MessageBody::Bytes(Bytes::from_static(&[1, 2, 3])));
        assert_eq!(MessageBody::from(Bytes::from_static(b"ab")), MessageBody::Bytes(Bytes::from_static(b"ab")));
    }

    #[test]
    fn len_counts_bytes() {
        assert_eq!(MessageBody::from("café").len(), 5);
        assert_eq!(MessageBody::from(vec![0u8; 3]).len(), 3);
        assert!(MessageBody::from("").is_empty());
        assert!(MessageBody::Bytes(Bytes::new()).is_empty());
        assert!(!MessageBody::from("x").is_empty());
    }

    #[test]
    fn message_parts() {
        let headers = vec![("x-a".to_string(), "1".to_string())];
        let message = ResponseMessage::new(201, headers.clone(), MessageBody::from("ok"));

        assert_eq!(message.status(), 201);
        assert_eq!(message.headers(), headers.as_slice());
        assert_eq!(message.body(), &MessageBody::from("ok"));
        assert_eq!(message.into_parts(), (201, headers, MessageBody::from("ok")));
    }
}
