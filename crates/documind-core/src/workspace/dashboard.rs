use std::collections::HashSet;

use serde::Serialize;

use super::shelf::format_file_size;
use crate::client::ApiClient;
use crate::error::Result;
use crate::model::Document;

const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub name: String,
    pub value: String,
}

impl Stat {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Upload,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub user: String,
    pub document: String,
    pub time: String,
}

impl Activity {
    pub fn description(&self) -> String {
        match self.kind {
            ActivityKind::Upload => format!("Uploaded {}", self.document),
            ActivityKind::Chat => format!("Chatted about {}", self.document),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: Vec<Stat>,
    pub recent_activity: Vec<Activity>,
}

impl DashboardSnapshot {
    /// Placeholder figures shown before any real data is available.
    pub fn sample() -> Self {
        let activity = |kind, user: &str, document: &str, time: &str| Activity {
            kind,
            user: user.to_string(),
            document: document.to_string(),
            time: time.to_string(),
        };
        Self {
            stats: vec![
                Stat::new("Total Documents", "128"),
                Stat::new("Chat Sessions", "24"),
                Stat::new("Storage Used", "2.4 GB"),
                Stat::new("Active Users", "12"),
            ],
            recent_activity: vec![
                activity(ActivityKind::Upload, "John Doe", "Q4 Report.pdf", "2 hours ago"),
                activity(ActivityKind::Chat, "Jane Smith", "Product Specs.docx", "4 hours ago"),
                activity(ActivityKind::Upload, "Mike Johnson", "Meeting Notes.pdf", "1 day ago"),
            ],
        }
    }

    /// Figures derived from the documents the service returned.
    ///
    /// Storage is the summed content length. Recent activity lists the newest
    /// uploads first, by `created_at`.
    pub fn from_documents(documents: &[Document], chat_sessions: usize) -> Self {
        let storage: u64 = documents.iter().map(|d| d.content.len() as u64).sum();
        let users: HashSet<&str> = documents
            .iter()
            .map(|d| d.user_id.as_str())
            .filter(|u| !u.is_empty())
            .collect();

        let mut newest: Vec<&Document> = documents.iter().collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let recent_activity = newest
            .into_iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(|d| Activity {
                kind: ActivityKind::Upload,
                user: d.user_id.clone(),
                document: d.name.clone(),
                time: d.created_at.clone(),
            })
            .collect();

        Self {
            stats: vec![
                Stat::new("Total Documents", documents.len().to_string()),
                Stat::new("Chat Sessions", chat_sessions.to_string()),
                Stat::new("Storage Used", format_file_size(storage)),
                Stat::new("Active Users", users.len().to_string()),
            ],
            recent_activity,
        }
    }

    /// Fetch the document list and each document's chat history from the
    /// service. A chat session is a document with at least one message.
    pub async fn load(client: &ApiClient) -> Result<Self> {
        let documents = client.get_documents().await?;
        let mut chat_sessions = 0;
        for doc in &documents {
            if !client.get_chat_history(&doc.id).await?.is_empty() {
                chat_sessions += 1;
            }
        }
        tracing::debug!(documents = documents.len(), chat_sessions, "dashboard loaded");
        Ok(Self::from_documents(&documents, chat_sessions))
    }

    pub fn stat(&self, name: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.as_str())
    }
}
