use serde::{Deserialize, Deserializer, Serialize};
use crate::message::ChatTurn;

/// The generated component: structural code plus its stylesheet.
/// The two halves are always replaced together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePair {
    #[serde(rename = "jsxCode", default, deserialize_with = "null_as_default")]
    pub markup: String,
    #[serde(rename = "cssCode", default, deserialize_with = "null_as_default")]
    pub style: String,
}

impl SourcePair {
    pub fn new(markup: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
        }
    }

    /// No component has been generated yet
    pub fn is_empty(&self) -> bool {
        self.markup.trim().is_empty()
    }
}

/// A persisted playground session, as returned by the session API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "chatHistory", default, deserialize_with = "null_as_default")]
    pub transcript: Vec<ChatTurn>,
    #[serde(flatten)]
    pub source: SourcePair,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl SessionRecord {
    pub fn new(id: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name: "Untitled Session".to_string(),
            transcript: Vec::new(),
            source: SourcePair::default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Apply a snapshot written by the autosaver and bump the timestamp
    pub fn apply_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.name = snapshot.name.clone();
        self.transcript = snapshot.transcript.clone();
        self.source = snapshot.source.clone();
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Body of a session write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub name: String,
    #[serde(rename = "chatHistory")]
    pub transcript: Vec<ChatTurn>,
    #[serde(flatten)]
    pub source: SourcePair,
}

/// Summary of a session for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub updated_at: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
