use uuid::Uuid;

use super::{RepositoryError, StagedChange};
use crate::models::Note;

/// Keeps notes in insertion order inside the process.
#[derive(Default)]
pub struct MemoryStore {
    notes: tokio::sync::Mutex<Vec<Note>>,
}

impl MemoryStore {
    pub async fn find(&self, id: Uuid) -> Option<Note> {
        self.notes
            .lock()
            .await
            .iter()
            .find(|note| note.id == id)
            .cloned()
    }

    pub async fn list(&self) -> Vec<Note> {
        self.notes.lock().await.clone()
    }

    /// Applies the batch to a copy and swaps it in only if every change
    /// succeeded.
    pub async fn apply(&self, changes: &[StagedChange]) -> Result<(), RepositoryError> {
        let mut notes = self.notes.lock().await;
        let mut next = notes.clone();

        for change in changes {
            let position = next.iter().position(|note| note.id == change.id());

            match (change, position) {
                (StagedChange::Insert(_), Some(_)) => {
                    return Err(RepositoryError::DuplicateKey(change.id()));
                }
                (StagedChange::Insert(note), None) => next.push(note.clone()),
                (StagedChange::Update(note), Some(i)) => {
                    let stored = &mut next[i];
                    stored.title.clone_from(&note.title);
                    stored.content.clone_from(&note.content);
                    stored.is_visible = note.is_visible;
                }
                (StagedChange::Delete(_), Some(i)) => {
                    next.remove(i);
                }
                (StagedChange::Update(_) | StagedChange::Delete(_), None) => {
                    return Err(RepositoryError::StaleRecord(change.id()));
                }
            }
        }

        *notes = next;

        Ok(())
    }
}
