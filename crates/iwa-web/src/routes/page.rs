//! Page and HTMX partial handlers for the input controls.

use askama::Template;
use axum::{
    extract::Query,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use iwa_core::presentation::{input_visibility, STATUS_ANALYZING};
use iwa_core::submission::ACCEPTED_EXTENSIONS;
use iwa_core::InputMode;
use serde::Deserialize;
use tracing::debug;

use super::template_error;
use crate::session::{new_session_id, session_cookie, session_id};

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    modes: Vec<ModeView>,
    inputs: InputsView,
    analyzing: &'static str,
}

#[derive(Template)]
#[template(path = "partials/inputs.html")]
struct InputsTemplate {
    inputs: InputsView,
}

/// View model for one mode selector option.
struct ModeView {
    value: &'static str,
    label: &'static str,
    checked: bool,
}

/// View model for the two input controls.
struct InputsView {
    upload_visible: bool,
    capture_visible: bool,
    accept: String,
}

impl InputsView {
    fn for_mode(mode: InputMode) -> Self {
        let visibility = input_visibility(mode);
        Self {
            upload_visible: visibility.upload,
            capture_visible: visibility.capture,
            accept: ACCEPTED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

// ============================================================
// REQUEST TYPES
// ============================================================

#[derive(Deserialize, Default)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

impl ModeQuery {
    fn mode(&self) -> InputMode {
        self.mode.as_deref().map(InputMode::from_str).unwrap_or_default()
    }
}

// ============================================================
// HANDLERS
// ============================================================

/// GET / - Render the full page. Starts a session if the browser has none.
pub async fn index(headers: HeaderMap, Query(query): Query<ModeQuery>) -> Response {
    let mode = query.mode();
    let template = IndexTemplate {
        modes: [InputMode::Upload, InputMode::Capture]
            .into_iter()
            .map(|m| ModeView {
                value: m.as_str(),
                label: m.label(),
                checked: m == mode,
            })
            .collect(),
        inputs: InputsView::for_mode(mode),
        analyzing: STATUS_ANALYZING,
    };

    let html = match template.render() {
        Ok(html) => html,
        Err(e) => return template_error(e),
    };

    match session_id(&headers) {
        Some(_) => Html(html).into_response(),
        None => {
            let id = new_session_id();
            debug!(session = %id, "Starting session");
            ([(header::SET_COOKIE, session_cookie(&id))], Html(html)).into_response()
        }
    }
}

/// GET /inputs - Swap the input controls when the mode changes.
pub async fn inputs(Query(query): Query<ModeQuery>) -> Response {
    let mode = query.mode();
    debug!(mode = mode.as_str(), "Input mode changed");

    match (InputsTemplate { inputs: InputsView::for_mode(mode) }).render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => template_error(e),
    }
}

/// GET /health - Liveness check.
pub async fn health() -> &'static str {
    "ok"
}
