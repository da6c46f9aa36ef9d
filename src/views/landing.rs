use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::landing;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    drafts: Vec<DraftItem>,
    name: String,
    error: String,
}

struct DraftItem {
    id: String,
    name: String,
    field_count: usize,
}

#[derive(Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub name: String,
}

fn render(state: &SharedState, name: String, error: String) -> Html<String> {
    let drafts = landing::list_drafts(&state.drafts)
        .into_iter()
        .map(|f| DraftItem {
            id: f.id.to_string(),
            name: f.name,
            field_count: f.fields.len(),
        })
        .collect();

    let template = LandingTemplate {
        drafts,
        name,
        error,
    };
    Html(template.render().unwrap_or_default())
}

pub async fn index(State(state): State<SharedState>) -> Html<String> {
    render(&state, String::new(), String::new())
}

pub async fn create(State(state): State<SharedState>, Form(req): Form<CreateForm>) -> Response {
    match landing::create_draft(&state.drafts, &req.name) {
        Ok(form) => Redirect::to(&format!("/form/{}", form.id)).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            render(&state, req.name, e.message().to_string()),
        )
            .into_response(),
    }
}
