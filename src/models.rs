// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// A citation attached to a bot answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub link: String,
}

impl Source {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// One entry of the chat history. Fields are private so a message cannot be
/// changed after it has been shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    text: String,
    sources: Vec<Source>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn bot(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            sources,
        }
    }

    /// A bot message without citations, used for the fixed error notices.
    pub fn bot_notice(text: impl Into<String>) -> Self {
        Self::bot(text, Vec::new())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Successful answer from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<Source>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Source>>::deserialize(deserializer)?.unwrap_or_default())
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank query; nothing was sent.
    Skipped,
    Displayed,
    ServerError(u16),
    ConnectionError,
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Skipped => write!(f, "skipped"),
            SubmitOutcome::Displayed => write!(f, "displayed"),
            SubmitOutcome::ServerError(status) => write!(f, "server error ({})", status),
            SubmitOutcome::ConnectionError => write!(f, "connection error"),
        }
    }
}

/// Diagnostic record of one request/response exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub outcome: String,
    pub response_time_ms: u128,
}
