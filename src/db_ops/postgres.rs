use super::{check_key_unchanged, NoteStore, StoreError, StoreResult};
use crate::{
    config::{PgConfig, CONTENT_MAX_LEN, PG_MAX_CONNECTIONS, TITLE_MAX_LEN, TITLE_MIN_LEN},
    models::{Note, NoteDraft},
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query, query_as, FromRow,
};
use tracing::{debug, info};

#[derive(FromRow)]
struct NoteRow {
    id: i32,
    title: String,
    content: String,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            note_id: row.id,
            title: row.title,
            content: row.content,
        }
    }
}

/// Constraint violations (SQLSTATE class 23) mean Postgres refused the
/// write; anything else is a backend fault.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().map_or(false, |code| code.starts_with("23")) {
                return StoreError::Rejected(db_err.message().to_string());
            }
        }
        StoreError::Backend(err.into())
    }
}

#[derive(Clone, Debug)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        PgStore { db }
    }

    pub async fn connect(config: &PgConfig) -> Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(PG_MAX_CONNECTIONS)
            .connect(&config.url())
            .await?;
        info!(host = %config.host, db = %config.db, "connected to postgres");

        Ok(Self::new(db))
    }

    /// Create the `note` table if it isn't there yet. The check constraints
    /// repeat the request validation rules.
    pub async fn init_schema(&self) -> Result<()> {
        let ddl = format!(
            "create table if not exists note (
                id serial primary key,
                title varchar({TITLE_MAX_LEN}) not null
                    check (char_length(title) >= {TITLE_MIN_LEN}),
                content text not null
                    check (char_length(content) <= {CONTENT_MAX_LEN})
            )"
        );
        query(&ddl).execute(&self.db).await?;

        Ok(())
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Note>> {
        let rows = query_as::<_, NoteRow>(
            "select id, title, content from note order by id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Note>> {
        let row = query_as::<_, NoteRow>(
            "select id, title, content from note where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Note::from))
    }

    async fn insert(&self, draft: NoteDraft) -> StoreResult<Note> {
        let row = query_as::<_, NoteRow>(
            "insert into note (title, content) values ($1, $2)
            returning id, title, content",
        )
        .bind(draft.title)
        .bind(draft.content)
        .fetch_one(&self.db)
        .await?;
        debug!(note_id = row.id, "inserted note");

        Ok(row.into())
    }

    async fn update(&self, id: i32, draft: NoteDraft) -> StoreResult<Note> {
        check_key_unchanged(id, &draft)?;
        let row = query_as::<_, NoteRow>(
            "update note
            set
                title = $1,
                content = $2
            where id = $3
            returning id, title, content",
        )
        .bind(draft.title)
        .bind(draft.content)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        debug!(note_id = id, updated = row.is_some(), "updated note");

        row.map(Note::from).ok_or_else(|| {
            StoreError::Rejected(format!(
                "Note with ID: {id} was removed before it could be updated."
            ))
        })
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        query("delete from note where id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        debug!(note_id = id, "deleted note");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL to point at a scratch database");
        let db = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("pool to be able to connect");
        let store = PgStore::new(db);
        store.init_schema().await.unwrap();
        store
    }

    fn draft(title: &str, content: &str) -> NoteDraft {
        NoteDraft {
            note_id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn crud_round_trip() {
        let store = store().await;
        let note = store.insert(draft("Groceries", "Milk, eggs")).await.unwrap();
        assert_eq!(store.get(note.note_id).await.unwrap(), Some(note.clone()));

        let updated = store
            .update(note.note_id, draft("Groceries v2", "Milk"))
            .await
            .unwrap();
        assert_eq!(updated.note_id, note.note_id);
        assert_eq!(updated.title, "Groceries v2");

        store.delete(note.note_id).await.unwrap();
        assert_eq!(store.get(note.note_id).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn check_constraint_rejects_write() {
        let store = store().await;
        let note = store.insert(draft("Groceries", "")).await.unwrap();
        let result = store.update(note.note_id, draft("Hi", "")).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));

        let unchanged = store.get(note.note_id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Groceries");
        store.delete(note.note_id).await.unwrap();
    }
}
