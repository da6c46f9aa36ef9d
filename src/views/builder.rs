use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::builder::{BuilderStatus, FormBuilder};
use crate::error::AppError;
use crate::models::{FieldKind, FieldPatch};
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "builder.html")]
struct BuilderTemplate {
    form_id: String,
    form_name: String,
    fields: Vec<FieldView>,
    error: String,
}

#[derive(Template)]
#[template(path = "builder_saved.html")]
struct SavedTemplate {
    form_id: String,
    form_name: String,
    share_url: String,
}

#[derive(Template)]
#[template(path = "message.html")]
pub(crate) struct MessageTemplate {
    pub title: String,
    pub message: String,
}

struct FieldView {
    id: String,
    number: usize,
    kind_name: String,
    label: String,
    required: bool,
    options_text: String,
    kinds: Vec<KindOption>,
}

struct KindOption {
    value: String,
    name: String,
    selected: bool,
}

#[derive(Deserialize)]
pub struct ChangeFieldForm {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    pub required: Option<String>,
    #[serde(default)]
    pub options: String,
}

impl ChangeFieldForm {
    fn into_patch(self) -> FieldPatch {
        FieldPatch {
            kind: Some(self.kind),
            label: Some(self.label),
            required: Some(self.required.is_some()),
            options: Some(parse_options(&self.options)),
        }
    }
}

/// Split a comma separated choice list, dropping blanks.
fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn render_builder(builder: &FormBuilder<'_>) -> Html<String> {
    let fields = builder
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| FieldView {
            id: field.id.to_string(),
            number: i + 1,
            kind_name: field.kind.display_name().to_string(),
            label: field.label.clone(),
            required: field.required,
            options_text: field.options.as_deref().unwrap_or_default().join(", "),
            kinds: FieldKind::ALL
                .iter()
                .map(|k| KindOption {
                    value: k.as_str().to_string(),
                    name: k.display_name().to_string(),
                    selected: *k == field.kind,
                })
                .collect(),
        })
        .collect();

    let error = match builder.status() {
        BuilderStatus::Editing { error: Some(e) } => e.clone(),
        _ => String::new(),
    };

    let template = BuilderTemplate {
        form_id: builder.form_id().to_string(),
        form_name: builder.name().to_string(),
        fields,
        error,
    };
    Html(template.render().unwrap_or_default())
}

pub(crate) fn render_message(status: StatusCode, title: &str, message: &str) -> Response {
    let template = MessageTemplate {
        title: title.to_string(),
        message: message.to_string(),
    };
    (status, Html(template.render().unwrap_or_default())).into_response()
}

fn not_found(err: AppError) -> Response {
    render_message(StatusCode::NOT_FOUND, "Not found", err.message())
}

fn back_to(form_id: Uuid) -> Response {
    Redirect::to(&format!("/form/{form_id}")).into_response()
}

pub async fn show(State(state): State<SharedState>, Path(form_id): Path<Uuid>) -> Response {
    match FormBuilder::open(&state.drafts, form_id) {
        Ok(builder) => render_builder(&builder).into_response(),
        Err(e) => not_found(e),
    }
}

pub async fn add_field(State(state): State<SharedState>, Path(form_id): Path<Uuid>) -> Response {
    match FormBuilder::open(&state.drafts, form_id) {
        Ok(mut builder) => {
            builder.add_field();
            back_to(form_id)
        }
        Err(e) => not_found(e),
    }
}

pub async fn change_field(
    State(state): State<SharedState>,
    Path((form_id, field_id)): Path<(Uuid, Uuid)>,
    Form(req): Form<ChangeFieldForm>,
) -> Response {
    let mut builder = match FormBuilder::open(&state.drafts, form_id) {
        Ok(builder) => builder,
        Err(e) => return not_found(e),
    };
    match builder.change_field(field_id, req.into_patch()) {
        Ok(_) => back_to(form_id),
        Err(e) => not_found(e),
    }
}

pub async fn remove_field(
    State(state): State<SharedState>,
    Path((form_id, field_id)): Path<(Uuid, Uuid)>,
) -> Response {
    let mut builder = match FormBuilder::open(&state.drafts, form_id) {
        Ok(builder) => builder,
        Err(e) => return not_found(e),
    };
    match builder.remove_field(field_id) {
        Ok(_) => back_to(form_id),
        Err(e) => not_found(e),
    }
}

pub async fn save(State(state): State<SharedState>, Path(form_id): Path<Uuid>) -> Response {
    let mut builder = match FormBuilder::open(&state.drafts, form_id) {
        Ok(builder) => builder,
        Err(e) => return not_found(e),
    };

    match builder.save(&state.client, &state.config.base_url).await {
        Ok(_) => {
            let share_url = match builder.status() {
                BuilderStatus::Saved { share_url } => share_url.clone(),
                _ => String::new(),
            };
            let template = SavedTemplate {
                form_id: form_id.to_string(),
                form_name: builder.name().to_string(),
                share_url,
            };
            Html(template.render().unwrap_or_default()).into_response()
        }
        Err(e) => {
            let status = match e {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, render_builder(&builder)).into_response()
        }
    }
}
