use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::WorkspaceConfig;
use crate::model::UploadFile;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in powers of 1024, two decimals at most.
///
/// `0` is `"0 Bytes"`, `1536` is `"1.5 KB"`. Anything past gigabytes is still
/// expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }
    let scaled = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelfEntry {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl ShelfEntry {
    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }
}

/// Files dropped onto the shelf, waiting out the simulated upload delay.
#[derive(Debug)]
pub struct PendingUpload {
    files: Vec<(String, u64, Option<String>)>,
    delay: Duration,
}

impl PendingUpload {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Wait for the delay, then stamp each file with a fresh id.
    pub async fn finish(self) -> Vec<ShelfEntry> {
        tokio::time::sleep(self.delay).await;
        let uploaded_at = Utc::now();
        self.files
            .into_iter()
            .map(|(name, size, mime_type)| ShelfEntry {
                id: Uuid::now_v7().to_string(),
                name,
                size,
                mime_type,
                uploaded_at,
            })
            .collect()
    }
}

/// Locally tracked uploads. Nothing here talks to the service.
#[derive(Debug)]
pub struct DocumentShelf {
    entries: Vec<ShelfEntry>,
    uploading: bool,
    upload_delay: Duration,
}

impl DocumentShelf {
    pub fn new(upload_delay: Duration) -> Self {
        Self {
            entries: Vec::new(),
            uploading: false,
            upload_delay,
        }
    }

    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new(config.upload_delay())
    }

    pub fn entries(&self) -> &[ShelfEntry] {
        &self.entries
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Mark the shelf busy and hand back the batch to wait on.
    pub fn start_upload(&mut self, files: &[UploadFile]) -> PendingUpload {
        self.uploading = true;
        PendingUpload {
            files: files
                .iter()
                .map(|f| (f.file_name.clone(), f.size(), f.mime_type.clone()))
                .collect(),
            delay: self.upload_delay,
        }
    }

    /// Append a finished batch and clear the busy flag.
    pub fn complete(&mut self, entries: Vec<ShelfEntry>) {
        tracing::debug!(count = entries.len(), "shelf upload complete");
        self.entries.extend(entries);
        self.uploading = false;
    }

    /// Run a whole simulated upload. Returns how many entries were added.
    pub async fn add_files(&mut self, files: &[UploadFile]) -> usize {
        let pending = self.start_upload(files);
        let entries = pending.finish().await;
        let added = entries.len();
        self.complete(entries);
        added
    }

    /// Drop the entry with `id`. Returns `false` when nothing matched.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}
