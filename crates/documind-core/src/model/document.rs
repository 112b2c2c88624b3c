use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocumindError, Result};

/// A document stored by the remote service.
///
/// The upload endpoint only echoes `id` and `name`, so the remaining fields
/// fall back to empty strings when the service leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
}

/// A file queued for upload: name, optional MIME type and raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, naming it after the last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DocumindError::InvalidInput(format!("not a file path: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
