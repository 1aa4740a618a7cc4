//! Multipart form bodies
//!
//! Content uploads (about, hero, education, projects, services, contact
//! details) are sent as `multipart/form-data`. A [`FormData`] is an ordered
//! list of text and file parts that stays cheap to clone, so it can travel
//! inside lifecycle actions; it is turned into a `reqwest` form only when the
//! request is sent.

use crate::error::RequestError;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// A file attached to a form.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// A file from in-memory bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    /// Set the part's content type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk. The part is named after the file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

        let upload = Self::new(file_name, bytes);
        Ok(match mime_for(path) {
            Some(mime) => upload.with_mime(mime),
            None => upload,
        })
    }

    /// The file name sent with the part.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_part(self) -> Result<Part, RequestError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| RequestError::Construction(format!("Invalid content type {mime:?}: {e}"))),
            None => Ok(part),
        }
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => return None,
    })
}

/// One named part of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field
    Text(String),
    /// File field
    File(FileUpload),
}

/// Ordered multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<(String, FormValue)>,
}

impl FormData {
    /// An empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, upload: FileUpload) -> Self {
        self.push_file(name, upload);
        self
    }

    /// Add a text field in place.
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push((name.into(), FormValue::Text(value.into())));
    }

    /// Add a file field in place.
    pub fn push_file(&mut self, name: impl Into<String>, upload: FileUpload) {
        self.parts.push((name.into(), FormValue::File(upload)));
    }

    /// Text fields from a JSON object.
    ///
    /// Strings are sent as-is, `null` is skipped, and every other value is
    /// sent as its JSON text (arrays and objects included).
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut form = Self::new();
        for (name, value) in object {
            match value {
                Value::Null => {},
                Value::String(text) => form.push_text(name, text.as_str()),
                other => form.push_text(name, other.to_string()),
            }
        }
        form
    }

    /// The first text value of field `name`.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(field, value)| match value {
            FormValue::Text(text) if field == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Iterate over `(name, value)` parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.parts.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the form has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Build the `reqwest` form.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Construction`] if a file carries an invalid content type.
    pub fn into_multipart(self) -> Result<Form, RequestError> {
        self.parts
            .into_iter()
            .try_fold(Form::new(), |form, (name, value)| match value {
                FormValue::Text(text) => Ok(form.text(name, text)),
                FormValue::File(upload) => Ok(form.part(name, upload.into_part()?)),
            })
    }
}
