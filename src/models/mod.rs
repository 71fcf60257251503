use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_visible: bool,
}

impl Note {
    /// Builds a note with a freshly generated id and the current time.
    ///
    /// The timestamp is truncated to microseconds, the precision of a
    /// postgres `TIMESTAMPTZ` column.
    pub fn new(title: String, content: String, is_visible: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            created_at: Utc::now().trunc_subsecs(6),
            is_visible,
        }
    }
}
