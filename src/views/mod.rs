pub mod builder;
pub mod landing;
pub mod render;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Landing
        .route("/", get(landing::index))
        .route("/forms", post(landing::create))
        // Builder
        .route("/form/{form_id}", get(builder::show))
        .route("/form/{form_id}/fields", post(builder::add_field))
        .route("/form/{form_id}/fields/{field_id}", post(builder::change_field))
        .route(
            "/form/{form_id}/fields/{field_id}/delete",
            post(builder::remove_field),
        )
        .route("/form/{form_id}/save", post(builder::save))
        // Renderer
        .route("/preview/{form_id}", get(render::show).post(render::step))
}
