use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::FieldKind;
use crate::renderer::{FormRenderer, RendererState};
use crate::sessions::SharedRenderer;
use crate::state::SharedState;

use super::builder::render_message;

const SESSION_COOKIE: &str = "fill_session";

#[derive(Template)]
#[template(path = "render.html")]
struct QuestionTemplate {
    form_id: String,
    form_name: String,
    has_question: bool,
    number: usize,
    total: usize,
    label: String,
    input: String,
    value: String,
    options: Vec<ChoiceView>,
    is_first: bool,
    is_last: bool,
    error: String,
}

#[derive(Template)]
#[template(path = "render_submitted.html")]
struct SubmittedTemplate {
    form_name: String,
}

struct ChoiceView {
    value: String,
    selected: bool,
}

#[derive(Deserialize)]
pub struct StepForm {
    pub action: String,
    pub value: Option<String>,
}

fn render_question(renderer: &FormRenderer) -> Html<String> {
    let field = renderer.current_field();
    let value = renderer.current_answer().unwrap_or_default().to_string();

    let input = match field.map(|f| f.kind) {
        Some(FieldKind::Textarea) => "textarea",
        Some(FieldKind::Number) => "number",
        Some(FieldKind::Select) => "select",
        _ => "text",
    };

    let options = field
        .and_then(|f| f.options.as_ref())
        .map(|opts| {
            opts.iter()
                .map(|o| ChoiceView {
                    value: o.clone(),
                    selected: *o == value,
                })
                .collect()
        })
        .unwrap_or_default();

    let template = QuestionTemplate {
        form_id: renderer.form_id().to_string(),
        form_name: renderer
            .form()
            .map(|f| f.form.name.clone())
            .unwrap_or_default(),
        has_question: field.is_some(),
        number: renderer.index() + 1,
        total: renderer.total(),
        label: field.map(|f| f.label.clone()).unwrap_or_default(),
        input: input.to_string(),
        value,
        options,
        is_first: renderer.is_first(),
        is_last: renderer.is_last(),
        error: renderer.error().unwrap_or_default().to_string(),
    };
    Html(template.render().unwrap_or_default())
}

fn render_submitted(renderer: &FormRenderer) -> Html<String> {
    let template = SubmittedTemplate {
        form_name: renderer
            .form()
            .map(|f| f.form.name.clone())
            .unwrap_or_default(),
    };
    Html(template.render().unwrap_or_default())
}

fn session_cookie(form_id: Uuid, session_id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path(format!("/preview/{form_id}"))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The fill session named by the cookie, if it is still alive and belongs to this form.
async fn current_session(
    state: &SharedState,
    jar: &CookieJar,
    form_id: Uuid,
) -> Option<(Uuid, SharedRenderer)> {
    let session_id: Uuid = jar.get(SESSION_COOKIE)?.value().parse().ok()?;
    let renderer = state.sessions.get(session_id)?;
    let matches = renderer.lock().await.form_id() == form_id;
    matches.then_some((session_id, renderer))
}

pub async fn show(
    State(state): State<SharedState>,
    Path(form_id): Path<Uuid>,
    jar: CookieJar,
) -> Response {
    if let Some((_, renderer)) = current_session(&state, &jar, form_id).await {
        let renderer = renderer.lock().await;
        return render_question(&renderer).into_response();
    }

    let mut renderer = FormRenderer::new(form_id);
    renderer.load(&state.client).await;
    if let RendererState::Error(err) = renderer.state() {
        return render_message(err.status(), "Form unavailable", err.message());
    }

    state.sessions.cleanup(state.config.session_ttl);
    let page = render_question(&renderer);
    let (session_id, _) = state.sessions.start(renderer);
    tracing::debug!(%form_id, %session_id, "Fill session started");

    (jar.add(session_cookie(form_id, session_id)), page).into_response()
}

pub async fn step(
    State(state): State<SharedState>,
    Path(form_id): Path<Uuid>,
    jar: CookieJar,
    Form(req): Form<StepForm>,
) -> Response {
    let back = Redirect::to(&format!("/preview/{form_id}")).into_response();

    let Some((session_id, renderer)) = current_session(&state, &jar, form_id).await else {
        tracing::debug!(%form_id, "Step posted without a live fill session");
        return render_message(
            StatusCode::GONE,
            "Session expired",
            "Your session has expired and your last answer was not saved. Open the form again to start over.",
        );
    };
    let mut renderer = renderer.lock().await;

    // An empty value only counts when it clears an earlier answer.
    if let Some(value) = req.value {
        if !value.is_empty() || renderer.current_answer().is_some() {
            if let Err(e) = renderer.set_answer(value) {
                return render_message(StatusCode::BAD_REQUEST, "Cannot answer", e.message());
            }
        }
    }

    match req.action.as_str() {
        "next" => renderer.next(),
        "previous" => renderer.previous(),
        "submit" => {
            if renderer.submit(&state.client).await.is_ok() {
                state.sessions.remove(session_id);
                return render_submitted(&renderer).into_response();
            }
        }
        other => {
            return render_message(
                StatusCode::BAD_REQUEST,
                "Unknown action",
                &format!("Unknown action: {other}"),
            );
        }
    }

    back
}
