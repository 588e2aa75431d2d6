use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderMap, Uri};

use crate::native::{NativeBody, find_header};
use crate::protocol::Headers;

/// An inbound request as the transport delivers it: an absolute URL, a raw method token,
/// ordered header pairs and a single-use body.
#[derive(Debug)]
pub struct NativeRequest<B> {
    url: String,
    method: String,
    headers: Headers,
    body: NativeBody<B>,
}

impl<B> NativeRequest<B> {
    pub fn new(url: impl Into<String>, method: impl Into<String>, headers: Headers, body: B) -> Self {
        let content_type = find_header(&headers, CONTENT_TYPE.as_str()).map(str::to_string);
        Self { url: url.into(), method: method.into(), headers, body: NativeBody::new(body, content_type) }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &NativeBody<B> {
        &self.body
    }
}

/// Converts an `http::Request`.
///
/// An origin-form URI (`/path?query`) is made absolute with the `Host` header and the `http`
/// scheme. `HeaderMap` yields the values of one name together, so headers with interleaved
/// names come out grouped; use [`NativeRequest::new`] when the exact order matters.
impl<B> From<http::Request<B>> for NativeRequest<B> {
    fn from(request: http::Request<B>) -> Self {
        let (parts, body) = request.into_parts();

        let url = absolute_url(&parts.uri, &parts.headers);
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();

        NativeRequest::new(url, parts.method.as_str(), headers, body)
    }
}

fn absolute_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let host = uri
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| headers.get(HOST).and_then(|value| value.to_str().ok()))
        .unwrap_or("localhost");
    let path_and_query = uri.path_and_query().map_or("/", |path_and_query| path_and_query.as_str());

    format!("http://{host}{path_and_query}")
}
