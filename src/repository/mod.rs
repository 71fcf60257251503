mod context;
mod embedded;
mod memory;
mod postgres;

pub use context::NotesContext;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use uuid::Uuid;

use crate::{config::DatabaseConfig, models::Note};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Note {0} already exists")]
    DuplicateKey(Uuid),

    #[error("Note {0} no longer exists")]
    StaleRecord(Uuid),
}

/// A mutation recorded by a [`NotesContext`] and not yet written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    Insert(Note),
    Update(Note),
    Delete(Uuid),
}

impl StagedChange {
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Insert(note) | Self::Update(note) => note.id,
            Self::Delete(id) => *id,
        }
    }
}

/// Long-lived handle to the notes store.
///
/// Requests never touch the store directly: each one takes a fresh
/// [`NotesContext`] through [`Repository::context`].
pub enum Repository {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

impl Repository {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        match config {
            DatabaseConfig::Postgres { dsn } => Ok(Self::Postgres(PostgresStore::new(dsn).await?)),
            DatabaseConfig::Memory => {
                tracing::warn!("Using in-memory storage, notes will be lost on shutdown");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(store) => store.migrate().await,
            Self::Memory(_) => Ok(()),
        }
    }

    pub const fn context(&self) -> NotesContext<'_> {
        NotesContext::new(self)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Note>, RepositoryError> {
        match self {
            Self::Postgres(store) => store.find(id).await,
            Self::Memory(store) => Ok(store.find(id).await),
        }
    }

    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        match self {
            Self::Postgres(store) => store.list().await,
            Self::Memory(store) => Ok(store.list().await),
        }
    }

    async fn apply(&self, changes: &[StagedChange]) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(store) => store.apply(changes).await,
            Self::Memory(store) => store.apply(changes).await,
        }
    }
}
