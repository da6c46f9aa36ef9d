use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Field;
use crate::renderer::{FormRenderer, RendererState};
use crate::sessions::SharedRenderer;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub form_id: Uuid,
    pub form_name: String,
    pub state: &'static str,
    pub index: usize,
    pub total: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub field: Option<Field>,
    pub answer: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<Uuid>,
}

impl SessionView {
    fn new(session_id: Uuid, renderer: &FormRenderer) -> Self {
        let state = match renderer.state() {
            RendererState::Loading => "loading",
            RendererState::Error(_) => "error",
            RendererState::Active => "active",
            RendererState::Submitted => "submitted",
        };
        Self {
            session_id,
            form_id: renderer.form_id(),
            form_name: renderer
                .form()
                .map(|f| f.form.name.clone())
                .unwrap_or_default(),
            state,
            index: renderer.index(),
            total: renderer.total(),
            is_first: renderer.is_first(),
            is_last: renderer.is_last(),
            field: renderer.current_field().cloned(),
            answer: renderer.current_answer().map(str::to_string),
            error: renderer.error().map(str::to_string),
            response_id: None,
        }
    }
}

#[derive(Deserialize)]
pub struct SetAnswer {
    pub value: String,
}

fn session(state: &SharedState, id: Uuid) -> Result<SharedRenderer, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
}

pub async fn start(
    State(state): State<SharedState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut renderer = FormRenderer::new(form_id);
    renderer.load(&state.client).await;
    if let RendererState::Error(err) = renderer.state() {
        return Err(err.clone());
    }

    state.sessions.cleanup(state.config.session_ttl);
    let (id, renderer) = state.sessions.start(renderer);
    let renderer = renderer.lock().await;
    Ok(Json(SessionView::new(id, &renderer)))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let renderer = session(&state, id)?;
    let renderer = renderer.lock().await;
    Ok(Json(SessionView::new(id, &renderer)))
}

pub async fn next(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let renderer = session(&state, id)?;
    let mut renderer = renderer.lock().await;
    renderer.next();
    Ok(Json(SessionView::new(id, &renderer)))
}

pub async fn previous(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let renderer = session(&state, id)?;
    let mut renderer = renderer.lock().await;
    renderer.previous();
    Ok(Json(SessionView::new(id, &renderer)))
}

pub async fn answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetAnswer>,
) -> Result<Json<SessionView>, AppError> {
    let renderer = session(&state, id)?;
    let mut renderer = renderer.lock().await;
    renderer.set_answer(req.value)?;
    Ok(Json(SessionView::new(id, &renderer)))
}

pub async fn submit(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let renderer = session(&state, id)?;
    let mut renderer = renderer.lock().await;
    let response = renderer.submit(&state.client).await?;

    let mut view = SessionView::new(id, &renderer);
    view.response_id = Some(response.id);
    Ok(Json(view))
}
