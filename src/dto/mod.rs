use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Note;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: Uuid,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time, set by the server
    pub created_at: DateTime<Utc>,
    /// Visibility flag
    pub is_visible: bool,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            is_visible: note.is_visible,
        }
    }
}

/// Body of both create and update requests.
///
/// Missing fields fall back to their defaults, and `id` or `createdAt`
/// sent by the client are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteRequest {
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Visibility flag
    pub is_visible: bool,
}
