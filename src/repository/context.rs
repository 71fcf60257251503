use uuid::Uuid;

use super::{Repository, RepositoryError, StagedChange};
use crate::models::Note;

/// Request-scoped view of the notes store.
///
/// `add`, `update` and `remove` only record a [`StagedChange`]. Nothing
/// reaches the store until [`NotesContext::save`] writes the whole batch as
/// one unit.
pub struct NotesContext<'a> {
    repo: &'a Repository,
    staged: Vec<StagedChange>,
}

impl<'a> NotesContext<'a> {
    pub(super) const fn new(repo: &'a Repository) -> Self {
        Self {
            repo,
            staged: Vec::new(),
        }
    }

    /// Point lookup by primary key. Changes staged in this context take
    /// precedence over the stored record.
    pub async fn find(&self, id: Uuid) -> Result<Option<Note>, RepositoryError> {
        if let Some(change) = self.staged.iter().rev().find(|change| change.id() == id) {
            return Ok(match change {
                StagedChange::Insert(note) | StagedChange::Update(note) => Some(note.clone()),
                StagedChange::Delete(_) => None,
            });
        }

        self.repo.find(id).await
    }

    /// Every stored note in creation order. Staged changes are not visible.
    pub async fn list_all(&self) -> Result<Vec<Note>, RepositoryError> {
        self.repo.list().await
    }

    pub fn add(&mut self, note: Note) {
        self.staged.push(StagedChange::Insert(note));
    }

    /// Marks `note` as modified. Only title, content and visibility are
    /// written back.
    pub fn update(&mut self, note: Note) {
        self.staged.push(StagedChange::Update(note));
    }

    pub fn remove(&mut self, note: &Note) {
        self.staged.push(StagedChange::Delete(note.id));
    }

    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    /// Commits staged changes and returns how many were written. On error
    /// nothing is written and the changes stay staged.
    pub async fn save(&mut self) -> Result<usize, RepositoryError> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        let written = self.staged();
        tracing::debug!("Saving {} staged change(s)", written);

        self.repo.apply(&self.staged).await?;

        self.staged.clear();

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str) -> Note {
        Note::new(title.to_string(), format!("{title} content"), true)
    }

    #[tokio::test]
    async fn staged_insert_is_invisible_to_other_contexts_until_saved() {
        let repo = Repository::in_memory();
        let note = note("draft");

        let mut ctx = repo.context();
        ctx.add(note.clone());

        assert_eq!(ctx.staged(), 1);
        assert!(repo.context().find(note.id).await.unwrap().is_none());
        assert!(ctx.list_all().await.unwrap().is_empty());

        assert_eq!(ctx.save().await.unwrap(), 1);
        assert_eq!(ctx.staged(), 0);
        assert_eq!(repo.context().find(note.id).await.unwrap(), Some(note));
    }

    #[tokio::test]
    async fn find_prefers_staged_changes() {
        let repo = Repository::in_memory();
        let mut stored = note("stored");

        let mut ctx = repo.context();
        ctx.add(stored.clone());
        ctx.save().await.unwrap();

        let mut ctx = repo.context();
        stored.title = "edited".to_string();
        ctx.update(stored.clone());
        assert_eq!(ctx.find(stored.id).await.unwrap().unwrap().title, "edited");

        ctx.remove(&stored);
        assert!(ctx.find(stored.id).await.unwrap().is_none());
        assert_eq!(
            repo.context().find(stored.id).await.unwrap().unwrap().title,
            "stored"
        );
    }

    #[tokio::test]
    async fn update_keeps_id_and_creation_time() {
        let repo = Repository::in_memory();
        let original = note("before");

        let mut ctx = repo.context();
        ctx.add(original.clone());
        ctx.save().await.unwrap();

        let mut changed = original.clone();
        changed.title = "after".to_string();
        changed.content = String::new();
        changed.is_visible = false;
        changed.created_at = chrono::Utc::now() + chrono::Duration::days(1);

        let mut ctx = repo.context();
        ctx.update(changed);
        ctx.save().await.unwrap();

        let loaded = repo.context().find(original.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.created_at, original.created_at);
        assert_eq!(loaded.title, "after");
        assert_eq!(loaded.content, "");
        assert!(!loaded.is_visible);
    }

    #[tokio::test]
    async fn save_is_all_or_nothing() {
        let repo = Repository::in_memory();
        let existing = note("existing");

        let mut ctx = repo.context();
        ctx.add(existing.clone());
        ctx.save().await.unwrap();

        let fresh = note("fresh");
        let mut ctx = repo.context();
        ctx.add(fresh.clone());
        ctx.add(existing.clone());

        let err = ctx.save().await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey(id) if id == existing.id));
        assert_eq!(ctx.staged(), 2);
        assert!(repo.context().find(fresh.id).await.unwrap().is_none());
        assert_eq!(repo.context().list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_of_deleted_note_is_stale() {
        let repo = Repository::in_memory();
        let doomed = note("doomed");

        let mut ctx = repo.context();
        ctx.add(doomed.clone());
        ctx.save().await.unwrap();

        let mut writer = repo.context();
        writer.update(doomed.clone());

        let mut deleter = repo.context();
        deleter.remove(&doomed);
        deleter.save().await.unwrap();

        let err = writer.save().await.unwrap_err();
        assert!(matches!(err, RepositoryError::StaleRecord(id) if id == doomed.id));
    }

    #[tokio::test]
    async fn concurrent_updates_last_save_wins() {
        let repo = Repository::in_memory();
        let shared = note("shared");

        let mut ctx = repo.context();
        ctx.add(shared.clone());
        ctx.save().await.unwrap();

        let mut first = repo.context();
        let mut second = repo.context();

        let mut a = first.find(shared.id).await.unwrap().unwrap();
        let mut b = second.find(shared.id).await.unwrap().unwrap();
        a.title = "first".to_string();
        b.title = "second".to_string();
        first.update(a);
        second.update(b);

        first.save().await.unwrap();
        second.save().await.unwrap();

        let loaded = repo.context().find(shared.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "second");
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order() {
        let repo = Repository::in_memory();
        let notes: Vec<Note> = ["one", "two", "three"].into_iter().map(note).collect();

        let mut ctx = repo.context();
        for note in &notes {
            ctx.add(note.clone());
        }
        assert_eq!(ctx.save().await.unwrap(), 3);

        assert_eq!(repo.context().list_all().await.unwrap(), notes);
    }

    #[tokio::test]
    async fn save_without_changes_writes_nothing() {
        let repo = Repository::in_memory();

        assert_eq!(repo.context().save().await.unwrap(), 0);
    }
}
