use super::{
    config::BASE_PATH,
    errors::ServerError,
    extractors::ValidNote,
    models::AppState,
    service::ServiceError,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

fn not_found(id: i32) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Note with ID: {id} does not exist."),
    )
        .into_response()
}

pub async fn list_notes(
    State(AppState { notes }): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(notes.list_all().await?))
}

pub async fn get_note(
    State(AppState { notes }): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServerError> {
    Ok(match notes.get_by_id(id).await? {
        Some(note) => Json(note).into_response(),
        None => not_found(id),
    })
}

pub async fn create_note(
    State(AppState { notes }): State<AppState>,
    ValidNote(draft): ValidNote,
) -> Result<impl IntoResponse, ServerError> {
    let note = notes.add(draft).await?;
    let location = format!("{BASE_PATH}/{}", note.note_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(note),
    ))
}

pub async fn update_note(
    State(AppState { notes }): State<AppState>,
    Path(id): Path<i32>,
    ValidNote(draft): ValidNote,
) -> Result<Response, ServerError> {
    let Some(existing) = notes.get_by_id(id).await? else {
        return Ok(not_found(id));
    };

    match notes.update(&existing, draft).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(ServiceError::InvalidOperation(msg)) => {
            Ok((StatusCode::BAD_REQUEST, msg).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_note(
    State(AppState { notes }): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServerError> {
    let Some(note) = notes.get_by_id(id).await? else {
        return Ok(not_found(id));
    };
    notes.delete(note).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
