//! Field rules for incoming notes. Requests that fail here never reach the
//! service layer.

use super::{
    config::{CONTENT_MAX_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN},
    models::{NoteDraft, NotePayload},
};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: String) {
        self.errors.entry(field).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The body couldn't be read as a note at all, e.g. a field of the wrong
    /// JSON type. Reported under the `$` key the way a field error would be.
    pub fn unreadable_body(message: String) -> Self {
        let mut errors = Self::default();
        errors.add("$", message);
        errors
    }

    #[cfg(test)]
    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        let body = json!({
            "type": "https://tools.ietf.org/html/rfc9110#section-15.5.1",
            "title": "One or more validation errors occurred.",
            "status": StatusCode::BAD_REQUEST.as_u16(),
            "errors": self.errors,
        });
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(body),
        )
            .into_response()
    }
}

/// With `blank_is_missing`, a value made only of whitespace counts as absent.
fn check_required<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &'a Option<String>,
    blank_is_missing: bool,
) -> Option<&'a str> {
    match value {
        Some(v) if !(blank_is_missing && v.trim().is_empty()) => Some(v.as_str()),
        _ => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
    }
}

fn check_min_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
) {
    if value.chars().count() < min {
        errors.add(
            field,
            format!(
                "The field {field} must be a string with a minimum length of '{min}'."
            ),
        );
    }
}

fn check_max_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: usize,
) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The field {field} must be a string with a maximum length of '{max}'."
            ),
        );
    }
}

pub fn validate(payload: &NotePayload) -> Result<NoteDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = check_required(&mut errors, "Title", &payload.title, true);
    if let Some(title) = title {
        check_min_len(&mut errors, "Title", title, TITLE_MIN_LEN);
        check_max_len(&mut errors, "Title", title, TITLE_MAX_LEN);
    }
    let content = check_required(&mut errors, "Content", &payload.content, false);
    if let Some(content) = content {
        check_max_len(&mut errors, "Content", content, CONTENT_MAX_LEN);
    }

    match (title, content) {
        (Some(title), Some(content)) if errors.is_empty() => Ok(NoteDraft {
            note_id: payload.note_id,
            title: title.to_string(),
            content: content.to_string(),
        }),
        _ => Err(errors),
    }
}
