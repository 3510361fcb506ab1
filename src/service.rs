use super::{
    db_ops::{NoteStore, StoreError},
    models::{Note, NoteDraft},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The store refused an update. Handlers turn this into a 400.
    #[error("{0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(msg) => ServiceError::InvalidOperation(msg),
            StoreError::Backend(err) => ServiceError::Store(err),
        }
    }
}

type Result<T> = std::result::Result<T, ServiceError>;

/// Sits between the handlers and whichever [`NoteStore`] we were started
/// with. Cloning is cheap; every clone shares the same store.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        NoteService { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Note>> {
        let notes = self.store.list().await?;
        debug!(count = notes.len(), "listed notes");
        Ok(notes)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Note>> {
        Ok(self.store.get(id).await?)
    }

    pub async fn add(&self, draft: NoteDraft) -> Result<Note> {
        let note = self.store.insert(draft).await?;
        debug!(note_id = note.note_id, "added note");
        Ok(note)
    }

    /// Overwrite `existing` with `values`, keeping its id.
    pub async fn update(&self, existing: &Note, values: NoteDraft) -> Result<Note> {
        match self.store.update(existing.note_id, values).await {
            Ok(note) => {
                debug!(note_id = note.note_id, "updated note");
                Ok(note)
            }
            Err(StoreError::Rejected(msg)) => {
                warn!(note_id = existing.note_id, %msg, "update rejected");
                Err(ServiceError::InvalidOperation(msg))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, note: Note) -> Result<()> {
        self.store.delete(note.note_id).await?;
        debug!(note_id = note.note_id, "deleted note");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_ops::memory::MemoryStore;

    fn service() -> NoteService {
        NoteService::new(Arc::new(MemoryStore::new()))
    }

    fn draft(title: &str, content: &str) -> NoteDraft {
        NoteDraft {
            note_id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn added_note_can_be_read_back() {
        let notes = service();
        let note = notes.add(draft("Groceries", "Milk, eggs")).await.unwrap();
        let found = notes.get_by_id(note.note_id).await.unwrap().unwrap();
        assert_eq!(found.title, "Groceries");
        assert_eq!(found.content, "Milk, eggs");
    }

    #[tokio::test]
    async fn missing_note_is_none_not_error() {
        assert!(service().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn key_change_is_invalid_operation() {
        let notes = service();
        let note = notes.add(draft("Groceries", "")).await.unwrap();
        let mut values = draft("Groceries v2", "");
        values.note_id = Some(note.note_id + 1);

        let err = notes.update(&note, values).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidOperation(_)));
        let unchanged = notes.get_by_id(note.note_id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Groceries");
    }

    #[tokio::test]
    async fn list_counts_adds_minus_deletes() {
        let notes = service();
        let mut added = Vec::new();
        for i in 0..5 {
            added.push(notes.add(draft(&format!("Note {i}"), "")).await.unwrap());
        }
        for note in added.drain(..2) {
            notes.delete(note).await.unwrap();
        }

        let listed = notes.list_all().await.unwrap();
        assert_eq!(listed, added);
    }
}
