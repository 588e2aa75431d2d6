use tracing::trace;
use url::Url;

use crate::native::NativeRequest;
use crate::protocol::{Method, RequestMessage, Scheme, TranslateError};

/// Translates a native request into a structured [`RequestMessage`].
///
/// The URL is split with WHATWG rules:
/// - the scheme is [`Scheme::Https`] only for exactly `https`
/// - the port is present only when the URL names a non-default one
/// - the query is present whenever the URL has a `?`, so a bare trailing `?` gives `Some("")`
///
/// The method never fails to parse, unknown tokens become [`Method::Other`]. Headers are copied
/// in order, duplicates included. The body is shared with the native request and left unread.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidUrl`] when the native URL is not an absolute URL. The
/// transport guarantees one, so this is a broken contract rather than a bad client request.
pub fn translate_request<B>(native: &NativeRequest<B>) -> Result<RequestMessage<B>, TranslateError> {
    let url = Url::parse(native.url()).map_err(|e| TranslateError::invalid_url(native.url(), e))?;

    let method = Method::parse(native.method());
    let scheme = Scheme::from_url_scheme(url.scheme());
    let host = url.host_str().unwrap_or_default().to_string();
    let port = url.port();
    let path = url.path().to_string();
    let query = url.query().map(str::to_string);

    trace!(%method, %host, %path, headers = native.headers().len(), "translated request");

    Ok(RequestMessage::new(method, native.headers().to_vec(), scheme, host, port, path, query, native.body().clone()))
}
