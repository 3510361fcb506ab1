use super::service::NoteService;
use serde::{Deserialize, Serialize};

/// A persisted note. Only the store hands these out, so `note_id` is always
/// the id the store assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: i32,
    pub title: String,
    pub content: String,
}

/// The JSON body accepted by create and update, before validation. Every
/// field is optional here so that missing fields are reported as validation
/// errors rather than as deserialization failures.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotePayload {
    pub note_id: Option<i32>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Field values that passed validation and may be written to a store.
///
/// `note_id` is whatever the client sent. Inserts ignore it; updates use it
/// only to refuse key changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteDraft {
    pub note_id: Option<i32>,
    pub title: String,
    pub content: String,
}

#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
}
