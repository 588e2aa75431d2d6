//! A buffered `multipart/form-data` parser.
//!
//! The whole body is already in memory when this runs, so the parser works on a byte slice and
//! borrows part contents from it. Part headers are parsed with `httparse`.
//!
//! Layout handled:
//!
//! ```text
//! preamble (ignored)
//! --boundary[padding]CRLF
//! headers CRLF
//! CRLF
//! content
//! CRLF--boundary[padding]CRLF
//! ...
//! CRLF--boundary--
//! epilogue (ignored)
//! ```

use httparse::Status;
use thiserror::Error;

use crate::ensure;

/// Maximum number of headers in a single part
const MAX_PART_HEADERS: usize = 16;

/// Maximum boundary length allowed by RFC 2046
const MAX_BOUNDARY_LEN: usize = 70;

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum MultipartError {
    #[error("invalid multipart boundary '{boundary}'")]
    InvalidBoundary { boundary: String },

    #[error("multipart body does not contain the boundary delimiter")]
    MissingDelimiter,

    #[error("malformed boundary delimiter line")]
    MalformedDelimiter,

    #[error("multipart body is missing the closing boundary delimiter")]
    Unterminated,

    #[error("invalid part headers: {reason}")]
    InvalidHeaders { reason: String },

    #[error("part has no form-data content-disposition header")]
    MissingDisposition,

    #[error("part has no name")]
    MissingName,

    #[error("too many parts, exceed the limit {max_num}")]
    TooManyParts { max_num: usize },
}

impl MultipartError {
    fn invalid_headers<S: ToString>(str: S) -> Self {
        Self::InvalidHeaders { reason: str.to_string() }
    }
}

/// One field of a multipart body.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Part<'a> {
    pub(crate) name: String,
    pub(crate) filename: Option<String>,
    pub(crate) content: &'a [u8],
}

/// Splits `body` into its parts, in the order they appear.
///
/// An empty body and a body holding only the closing delimiter both yield no parts.
pub(crate) fn parse<'a>(body: &'a [u8], boundary: &str, max_parts: usize) -> Result<Vec<Part<'a>>, MultipartError> {
    ensure!(
        !boundary.is_empty() && boundary.len() <= MAX_BOUNDARY_LEN,
        MultipartError::InvalidBoundary { boundary: boundary.to_string() }
    );

    if body.is_empty() {
        return Ok(Vec::new());
    }

    let delimiter = format!("\r\n--{boundary}");
    let delimiter = delimiter.as_bytes();
    // the first delimiter either opens the body or starts a line after the preamble
    let mut cursor = if body.starts_with(&delimiter[2..]) {
        delimiter.len() - 2
    } else {
        find(body, delimiter).ok_or(MultipartError::MissingDelimiter)? + delimiter.len()
    };
    let mut parts = Vec::new();

    loop {
        if body[cursor..].starts_with(b"--") {
            return Ok(parts);
        }
        cursor = skip_delimiter_line(body, cursor)?;

        ensure!(parts.len() < max_parts, MultipartError::TooManyParts { max_num: max_parts });

        let mut headers = [httparse::EMPTY_HEADER; MAX_PART_HEADERS];
        let (header_len, headers) = match httparse::parse_headers(&body[cursor..], &mut headers) {
            Ok(Status::Complete(parsed)) => parsed,
            Ok(Status::Partial) => return Err(MultipartError::invalid_headers("incomplete part headers")),
            Err(e) => return Err(MultipartError::invalid_headers(e)),
        };

        let disposition = headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case("content-disposition"))
            .ok_or(MultipartError::MissingDisposition)?;
        let disposition = std::str::from_utf8(disposition.value).map_err(MultipartError::invalid_headers)?;
        let (name, filename) = parse_disposition(disposition)?;

        let start = cursor + header_len;
        let len = find(&body[start..], delimiter).ok_or(MultipartError::Unterminated)?;

        parts.push(Part { name, filename, content: &body[start..start + len] });
        cursor = start + len + delimiter.len();
    }
}

/// Skips the transport padding and line break after a delimiter, returning the index of the
/// first header byte.
fn skip_delimiter_line(body: &[u8], mut cursor: usize) -> Result<usize, MultipartError> {
    while matches!(body.get(cursor), Some(b' ' | b'\t')) {
        cursor += 1;
    }

    ensure!(body[cursor..].starts_with(b"\r\n"), MultipartError::MalformedDelimiter);
    Ok(cursor + 2)
}

/// Extracts `name` and `filename` from a `form-data` content-disposition value.
fn parse_disposition(value: &str) -> Result<(String, Option<String>), MultipartError> {
    let mut params = split_params(value).into_iter();

    let kind = params.next().unwrap_or_default().trim();
    ensure!(kind.eq_ignore_ascii_case("form-data"), MultipartError::MissingDisposition);

    let mut name = None;
    let mut filename = None;
    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.eq_ignore_ascii_case("name") {
            name = Some(unquote(value.trim()));
        } else if key.eq_ignore_ascii_case("filename") {
            filename = Some(unquote(value.trim()));
        }
    }

    let name = name.ok_or(MultipartError::MissingName)?;
    Ok((name, filename))
}

/// Splits on `;`, ignoring separators inside quoted strings.
///
/// Clients percent-encode quotes in form-data parameters, so a backslash is an ordinary
/// character here, not an escape.
fn split_params(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quoted = false;

    for (i, c) in value.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                segments.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    segments.push(&value[start..]);
    segments
}

fn unquote(value: &str) -> String {
    value.strip_prefix('"').and_then(|v| v.strip_suffix('"')).unwrap_or(value).to_string()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
