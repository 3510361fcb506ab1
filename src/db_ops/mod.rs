//! Persistence for notes. Every store implements [`NoteStore`]; handlers
//! only ever see it as an `Arc<dyn NoteStore>`.
//!
//! - [`memory::MemoryStore`] keeps notes in-process (the default)
//! - [`postgres::PgStore`] keeps them in a `note` table

pub mod memory;
pub mod postgres;

use super::models::{Note, NoteDraft};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write. Nothing was changed.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Each mutating call is committed before it returns.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Note>>;
    /// `Ok(None)` means there is no such note; it is not an error.
    async fn get(&self, id: i32) -> StoreResult<Option<Note>>;
    /// The store assigns the id; `draft.note_id` is ignored.
    async fn insert(&self, draft: NoteDraft) -> StoreResult<Note>;
    /// Overwrite every field of note `id` except the id itself.
    async fn update(&self, id: i32, draft: NoteDraft) -> StoreResult<Note>;
    async fn delete(&self, id: i32) -> StoreResult<()>;
}

/// A draft may repeat the id it is written to, or leave it out (zero counts
/// as left out), but it can't move a note to a different id.
pub fn check_key_unchanged(id: i32, draft: &NoteDraft) -> StoreResult<()> {
    match draft.note_id {
        Some(new_id) if new_id != 0 && new_id != id => {
            Err(StoreError::Rejected(format!(
                "The property 'Note.noteId' is part of a key and so cannot be \
                modified or marked as modified. Note {id} cannot become note \
                {new_id}."
            )))
        }
        _ => Ok(()),
    }
}
