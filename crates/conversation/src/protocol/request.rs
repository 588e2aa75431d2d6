//! The structured request message.

use crate::native::{NativeBody, find_header};
use crate::protocol::{Headers, Method};

/// URL scheme of a translated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// `Https` for exactly `https`, `Http` for anything else.
    pub fn from_url_scheme(scheme: &str) -> Self {
        if scheme == "https" { Scheme::Https } else { Scheme::Http }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// An immutable, structured HTTP request.
///
/// `port` and `query` are optional rather than defaulted, so a URL without a query
/// (`None`) stays distinguishable from one ending in a bare `?` (`Some("")`).
///
/// The body is the native handle itself, still unread. Pass it to one of the readers in
/// [`crate::read`] to consume it.
#[derive(Debug)]
pub struct RequestMessage<B> {
    method: Method,
    headers: Headers,
    scheme: Scheme,
    host: String,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    body: NativeBody<B>,
}

impl<B> RequestMessage<B> {
    #[allow(clippy::too_many_arguments, reason = "one argument per message field")]
    pub fn new(
        method: Method,
        headers: Headers,
        scheme: Scheme,
        host: String,
        port: Option<u16>,
        path: String,
        query: Option<String>,
        body: NativeBody<B>,
    ) -> Self {
        Self { method, headers, scheme, host, port, path, query, body }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Header pairs in the order the transport delivered them, duplicates included.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The explicit, non-default port of the request URL.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string without its leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn body(&self) -> &NativeBody<B> {
        &self.body
    }

    pub fn into_body(self) -> NativeBody<B> {
        self.body
    }
}
