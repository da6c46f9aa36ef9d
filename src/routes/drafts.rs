use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builder::{BuilderStatus, FormBuilder};
use crate::error::AppError;
use crate::landing;
use crate::models::{Field, FieldPatch, Form, FormPatch, PublishedForm};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateDraft {
    pub name: String,
}

#[derive(Serialize)]
pub struct SaveResult {
    pub form: PublishedForm,
    pub share_url: String,
}

pub async fn list(State(state): State<SharedState>) -> Json<Vec<Form>> {
    Json(landing::list_drafts(&state.drafts))
}

pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateDraft>,
) -> Result<Json<Form>, AppError> {
    let form = landing::create_draft(&state.drafts, &req.name)?;
    Ok(Json(form))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Form>, AppError> {
    let form = state
        .drafts
        .get(id)
        .ok_or_else(|| AppError::NotFound("Form not found".to_string()))?;
    Ok(Json(form))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FormPatch>,
) -> Result<Json<Form>, AppError> {
    if let Some(fields) = &patch.fields {
        ensure_unique_ids(fields)?;
    }
    let form = state
        .drafts
        .update(id, patch)
        .ok_or_else(|| AppError::NotFound("Form not found".to_string()))?;
    Ok(Json(form))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Json<serde_json::Value> {
    state.drafts.remove(id);
    Json(serde_json::json!({ "message": "Deleted" }))
}

pub async fn add_field(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Field>, AppError> {
    let mut builder = FormBuilder::open(&state.drafts, id)?;
    let field = builder.add_field().clone();
    Ok(Json(field))
}

pub async fn change_field(
    State(state): State<SharedState>,
    Path((id, field_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<FieldPatch>,
) -> Result<Json<Field>, AppError> {
    let mut builder = FormBuilder::open(&state.drafts, id)?;
    let field = builder.change_field(field_id, patch)?.clone();
    Ok(Json(field))
}

pub async fn remove_field(
    State(state): State<SharedState>,
    Path((id, field_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Field>, AppError> {
    let mut builder = FormBuilder::open(&state.drafts, id)?;
    let field = builder.remove_field(field_id)?;
    Ok(Json(field))
}

pub async fn save(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveResult>, AppError> {
    let mut builder = FormBuilder::open(&state.drafts, id)?;
    let form = builder.save(&state.client, &state.config.base_url).await?;

    let share_url = match builder.status() {
        BuilderStatus::Saved { share_url } => share_url.clone(),
        other => {
            return Err(AppError::Internal(format!(
                "Builder in unexpected state after save: {other:?}"
            )))
        }
    };

    Ok(Json(SaveResult { form, share_url }))
}

fn ensure_unique_ids(fields: &[Field]) -> Result<(), AppError> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.id == field.id) {
            return Err(AppError::BadRequest(format!(
                "Duplicate field id: {}",
                field.id
            )));
        }
    }
    Ok(())
}
