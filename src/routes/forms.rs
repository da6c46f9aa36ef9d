use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::PublishedForm;
use crate::state::SharedState;

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublishedForm>, AppError> {
    let form = state.client.get_form(id).await?;
    Ok(Json(form))
}
