pub mod drafts;
pub mod forms;
pub mod sessions;

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Drafts
        .route("/api/v1/drafts", get(drafts::list).post(drafts::create))
        .route(
            "/api/v1/drafts/{id}",
            get(drafts::get)
                .patch(drafts::update)
                .delete(drafts::delete),
        )
        // Builder
        .route("/api/v1/drafts/{id}/fields", post(drafts::add_field))
        .route(
            "/api/v1/drafts/{id}/fields/{field_id}",
            patch(drafts::change_field).delete(drafts::remove_field),
        )
        .route("/api/v1/drafts/{id}/save", post(drafts::save))
        // Published forms
        .route("/api/v1/forms/{id}", get(forms::get))
        .route("/api/v1/forms/{id}/sessions", post(sessions::start))
        // Fill sessions
        .route("/api/v1/sessions/{id}", get(sessions::get))
        .route("/api/v1/sessions/{id}/next", post(sessions::next))
        .route("/api/v1/sessions/{id}/previous", post(sessions::previous))
        .route("/api/v1/sessions/{id}/answer", put(sessions::answer))
        .route("/api/v1/sessions/{id}/submit", post(sessions::submit))
}
