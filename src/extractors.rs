use super::{
    models::{NoteDraft, NotePayload},
    validation::{self, ValidationErrors},
};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::Request,
    response::{IntoResponse, Response},
    Json,
};

/// A JSON note body that has passed validation.
///
/// Bodies that aren't valid JSON, or whose fields have the wrong JSON type,
/// get the same 400 problem response as out-of-bounds fields. A missing
/// `Content-Type: application/json` keeps axum's 415.
pub struct ValidNote(pub NoteDraft);

fn reject_json(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            ValidationErrors::unreadable_body(err.body_text()).into_response()
        }
        JsonRejection::JsonSyntaxError(err) => {
            ValidationErrors::unreadable_body(err.body_text()).into_response()
        }
        other => other.into_response(),
    }
}

#[async_trait]
impl<S, B> FromRequest<S, B> for ValidNote
where
    Json<NotePayload>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = Response;

    async fn from_request(
        req: Request<B>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<NotePayload>::from_request(req, state)
            .await
            .map_err(reject_json)?;

        validation::validate(&payload)
            .map(ValidNote)
            .map_err(IntoResponse::into_response)
    }
}
