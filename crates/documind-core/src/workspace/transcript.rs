use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::config::WorkspaceConfig;
use crate::error::Result;

/// Produces the assistant's answer for a transcript.
///
/// Implementations:
/// - `SimulatedReplies`: canned answer after a fixed delay
/// - `ApiReplies`: `POST /chat/{doc_id}` through an [`ApiClient`]
pub trait ReplySource: Send + Sync {
    fn reply(&self, input: &str) -> impl Future<Output = Result<String>> + Send;
}

pub struct SimulatedReplies {
    delay: Duration,
}

impl SimulatedReplies {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new(config.reply_delay())
    }
}

impl ReplySource for SimulatedReplies {
    async fn reply(&self, input: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(format!(
            "Based on the documents, I can help you with that. {input}"
        ))
    }
}

/// Replies from the service's chat endpoint for one document.
pub struct ApiReplies<'a> {
    client: &'a ApiClient,
    doc_id: String,
}

impl<'a> ApiReplies<'a> {
    pub fn new(client: &'a ApiClient, doc_id: impl Into<String>) -> Self {
        Self {
            client,
            doc_id: doc_id.into(),
        }
    }
}

impl ReplySource for ApiReplies<'_> {
    async fn reply(&self, input: &str) -> Result<String> {
        let reply = self.client.send_message(&self.doc_id, input).await?;
        Ok(reply.response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// A local conversation: user turns, bot turns and a typing indicator.
pub struct ChatTranscript<R> {
    source: R,
    entries: Vec<TranscriptEntry>,
    typing: bool,
}

impl<R: ReplySource> ChatTranscript<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            entries: Vec::new(),
            typing: false,
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Record a user turn and raise the typing indicator.
    /// Whitespace-only input is ignored.
    pub fn push_user(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }
        self.entries.push(TranscriptEntry::new(input, Sender::User));
        self.typing = true;
        true
    }

    /// Record a bot turn and lower the typing indicator.
    pub fn push_bot(&mut self, content: impl Into<String>) -> &TranscriptEntry {
        self.typing = false;
        self.entries.push(TranscriptEntry::new(content, Sender::Bot));
        &self.entries[self.entries.len() - 1]
    }

    /// Send `input` and wait for the reply.
    ///
    /// Returns `Ok(None)` for blank input. If the reply source fails, the user
    /// turn stays, the indicator is lowered and the error is returned.
    pub async fn submit(&mut self, input: &str) -> Result<Option<&TranscriptEntry>> {
        if !self.push_user(input) {
            return Ok(None);
        }
        let outcome = self.source.reply(input).await;
        match outcome {
            Ok(answer) => Ok(Some(self.push_bot(answer))),
            Err(e) => {
                self.typing = false;
                tracing::warn!("chat reply failed: {e}");
                Err(e)
            }
        }
    }
}
