use tokio_postgres::{Client, NoTls, Row, error::SqlState};
use uuid::Uuid;

use super::{RepositoryError, StagedChange, embedded::migrations};
use crate::models::Note;

pub struct PostgresStore {
    client: tokio::sync::Mutex<Client>,
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        is_visible: row.get("is_visible"),
    }
}

impl PostgresStore {
    pub async fn new(database_dsn: &str) -> Result<Self, RepositoryError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self {
            client: tokio::sync::Mutex::new(client),
        })
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        let mut client = self.client.lock().await;
        let migrations_report = migrations::runner().run_async(&mut *client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .lock()
            .await
            .query_opt(
                "SELECT id, title, content, created_at, is_visible FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    pub async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .lock()
            .await
            .query(
                "SELECT id, title, content, created_at, is_visible FROM notes ORDER BY created_at, id",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    /// Writes every change inside one transaction. Any failure rolls back
    /// the whole batch.
    pub async fn apply(&self, changes: &[StagedChange]) -> Result<(), RepositoryError> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        for change in changes {
            let affected = match change {
                StagedChange::Insert(note) => tx
                    .execute(
                        "INSERT INTO notes (id, title, content, created_at, is_visible) VALUES ($1, $2, $3, $4, $5)",
                        &[
                            &note.id,
                            &note.title,
                            &note.content,
                            &note.created_at,
                            &note.is_visible,
                        ],
                    )
                    .await
                    .map_err(|e| {
                        if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                            RepositoryError::DuplicateKey(note.id)
                        } else {
                            RepositoryError::Postgres(e)
                        }
                    })?,
                StagedChange::Update(note) => {
                    tx.execute(
                        "UPDATE notes SET title = $1, content = $2, is_visible = $3 WHERE id = $4",
                        &[&note.title, &note.content, &note.is_visible, &note.id],
                    )
                    .await?
                }
                StagedChange::Delete(id) => {
                    tx.execute("DELETE FROM notes WHERE id = $1", &[id])
                        .await?
                }
            };

            if affected != 1 {
                return Err(RepositoryError::StaleRecord(change.id()));
            }
        }

        tx.commit().await?;

        Ok(())
    }
}
