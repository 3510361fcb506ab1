use super::{check_key_unchanged, NoteStore, StoreError, StoreResult};
use crate::models::{Note, NoteDraft};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Notes live only as long as the process does. Ids start at 1 and are never
/// handed out twice, even after a delete.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    notes: BTreeMap<i32, Note>,
    next_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: RwLock::new(Inner {
                notes: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Note>> {
        Ok(self.inner.read().await.notes.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Note>> {
        Ok(self.inner.read().await.notes.get(&id).cloned())
    }

    async fn insert(&self, draft: NoteDraft) -> StoreResult<Note> {
        let mut inner = self.inner.write().await;
        let note_id = inner.next_id;
        inner.next_id = note_id.checked_add(1).ok_or_else(|| {
            StoreError::Rejected("note id sequence is exhausted".into())
        })?;
        let note = Note {
            note_id,
            title: draft.title,
            content: draft.content,
        };
        inner.notes.insert(note_id, note.clone());
        debug!(note_id, "inserted note in memory");

        Ok(note)
    }

    async fn update(&self, id: i32, draft: NoteDraft) -> StoreResult<Note> {
        check_key_unchanged(id, &draft)?;
        let mut inner = self.inner.write().await;
        // The caller looked the note up first, but a concurrent delete can
        // land in between.
        let Some(note) = inner.notes.get_mut(&id) else {
            return Err(StoreError::Rejected(format!(
                "Note with ID: {id} was removed before it could be updated."
            )));
        };
        note.title = draft.title;
        note.content = draft.content;
        debug!(note_id = id, "updated note in memory");

        Ok(note.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        self.inner.write().await.notes.remove(&id);
        debug!(note_id = id, "deleted note from memory");

        Ok(())
    }
}
