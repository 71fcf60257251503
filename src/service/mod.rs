use uuid::Uuid;

use crate::{
    dto::{NoteRequest, NoteResponse},
    models::Note,
    repository::{Repository, RepositoryError},
};

/// One method per REST operation. Every call opens its own
/// [`NotesContext`](crate::repository::NotesContext) and drops it on return.
pub struct NoteService {
    repo: Repository,
}

impl NoteService {
    pub const fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, RepositoryError> {
        self.repo
            .context()
            .list_all()
            .await
            .map(|notes| notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn get_one_note(&self, id: Uuid) -> Result<Option<NoteResponse>, RepositoryError> {
        self.repo
            .context()
            .find(id)
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn create_note(&self, request: NoteRequest) -> Result<NoteResponse, RepositoryError> {
        let note = Note::new(request.title, request.content, request.is_visible);

        let mut ctx = self.repo.context();
        ctx.add(note.clone());
        ctx.save().await?;

        tracing::info!("Created note {}", note.id);

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: Uuid,
        request: NoteRequest,
    ) -> Result<Option<NoteResponse>, RepositoryError> {
        let mut ctx = self.repo.context();

        let Some(mut note) = ctx.find(id).await? else {
            return Ok(None);
        };

        note.title = request.title;
        note.content = request.content;
        note.is_visible = request.is_visible;

        ctx.update(note.clone());
        ctx.save().await?;

        tracing::info!("Updated note {}", id);

        Ok(Some(note.into()))
    }

    pub async fn delete_note(&self, id: Uuid) -> Result<Option<NoteResponse>, RepositoryError> {
        let mut ctx = self.repo.context();

        let Some(note) = ctx.find(id).await? else {
            return Ok(None);
        };

        ctx.remove(&note);
        ctx.save().await?;

        tracing::info!("Deleted note {}", id);

        Ok(Some(note.into()))
    }
}
