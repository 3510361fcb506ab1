use super::{config::BASE_PATH, controllers, models};
use axum::routing::{get, Router};

pub fn get_routes() -> Router<models::AppState> {
    let item = format!("{BASE_PATH}/:id");
    Router::new()
        .route(
            BASE_PATH,
            get(controllers::list_notes).post(controllers::create_note),
        )
        .route(
            &item,
            get(controllers::get_note)
                .put(controllers::update_note)
                .delete(controllers::delete_note),
        )
}
