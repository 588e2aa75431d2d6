//! Form payloads: decoding `multipart/form-data` and `application/x-www-form-urlencoded`
//! bodies into a deterministic [`FormPayload`].

use mime::Mime;

use crate::ensure;
use crate::protocol::{BodyError, BodyReadResult};
use crate::read::multipart::{self, Part};

/// Metadata of an uploaded file. The file content itself is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    filename: String,
    relative_path: Option<String>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, relative_path: Option<String>) -> Self {
        Self { filename: filename.into(), relative_path }
    }

    /// Builds the metadata from the filename a client sent.
    ///
    /// Directory uploads send names like `photos/2024/cat.png`; the last segment becomes the
    /// filename and the full name the relative path.
    pub fn from_client_name(name: &str) -> Self {
        match name.rsplit_once('/') {
            Some((_, base)) => Self { filename: base.to_string(), relative_path: Some(name.to_string()) },
            None => Self { filename: name.to_string(), relative_path: None },
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }
}

/// A decoded form, split into plain values and uploaded files.
///
/// Both lists are sorted by key whatever order the client sent the fields in. The sort is
/// stable, so repeated keys keep their relative order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormPayload {
    values: Vec<(String, String)>,
    files: Vec<(String, UploadedFile)>,
}

impl FormPayload {
    pub fn new(mut values: Vec<(String, String)>, mut files: Vec<(String, UploadedFile)>) -> Self {
        values.sort_by(|a, b| a.0.cmp(&b.0));
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Self { values, files }
    }

    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    pub fn files(&self) -> &[(String, UploadedFile)] {
        &self.files
    }

    /// Returns the first value for `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Returns the first file for `key`.
    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }

    pub fn into_parts(self) -> (Vec<(String, String)>, Vec<(String, UploadedFile)>) {
        (self.values, self.files)
    }
}

/// Partitions multipart parts: a part with a filename is a file, its content is dropped.
fn from_parts(parts: Vec<Part<'_>>) -> FormPayload {
    let mut values = Vec::new();
    let mut files = Vec::new();

    for part in parts {
        match part.filename {
            Some(filename) => files.push((part.name, UploadedFile::from_client_name(&filename))),
            None => values.push((part.name, String::from_utf8_lossy(part.content).into_owned())),
        }
    }

    FormPayload::new(values, files)
}

/// Decodes a buffered form body according to its content type.
pub(crate) fn decode(content_type: Option<&str>, body: &[u8], max_parts: usize) -> BodyReadResult<FormPayload> {
    let content_type = content_type.ok_or_else(|| BodyError::parse("form body has no content-type"))?;
    let mime: Mime = content_type.parse().map_err(|e| BodyError::parse(format!("invalid content-type '{content_type}': {e}")))?;

    if mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA {
        let boundary = mime.get_param(mime::BOUNDARY).ok_or_else(|| BodyError::parse("multipart content-type has no boundary"))?;
        let parts = multipart::parse(body, boundary.as_str(), max_parts).map_err(BodyError::parse)?;
        return Ok(from_parts(parts));
    }

    if mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED {
        let values: Vec<(String, String)> = serde_urlencoded::from_bytes(body).map_err(BodyError::parse)?;
        ensure!(values.len() <= max_parts, BodyError::parse(format!("too many fields, exceed the limit {max_parts}")));
        return Ok(FormPayload::new(values, Vec::new()));
    }

    Err(BodyError::parse(format!("unsupported form content-type '{content_type}'")))
}
