//! Submission handler.
//!
//! Returns an HTML fragment for the analysis area: preview, completion
//! status and the rendered result text.

use askama::Template;
use axum::{
    extract::{multipart::Field, Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use iwa_core::presentation::{preview_for, render_markdown, Lifecycle, Preview, STATUS_COMPLETE};
use iwa_core::{acquire, FilePart, InputMode, IwaResult};
use tracing::{debug, info};

use super::template_error;
use crate::session::{new_session_id, session_id};
use crate::state::AppState;

/// Shown when the same session submits while an analysis is running.
pub const BUSY_NOTICE: &str = "An analysis is already in progress. Please wait for it to finish.";

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "partials/result.html")]
struct ResultTemplate {
    preview_image: Option<String>,
    notice: Option<String>,
    status: Option<&'static str>,
    body_html: String,
    is_error: bool,
}

impl ResultTemplate {
    fn notice(message: impl Into<String>) -> Self {
        Self {
            preview_image: None,
            notice: Some(message.into()),
            status: None,
            body_html: String::new(),
            is_error: false,
        }
    }
}

// ============================================================
// REQUEST TYPES
// ============================================================

/// The multipart form posted by the page.
#[derive(Default)]
struct SubmissionForm {
    mode: InputMode,
    upload: Option<FilePart>,
    capture: Option<FilePart>,
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, (StatusCode, String)> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("mode") => {
                let value = field.text().await.map_err(multipart_error)?;
                form.mode = InputMode::from_str(&value);
            }
            Some("upload") => form.upload = Some(read_file(field).await?),
            Some("capture") => form.capture = Some(read_file(field).await?),
            other => debug!(field = ?other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_file(field: Field<'_>) -> Result<FilePart, (StatusCode, String)> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(FilePart::new(filename, content_type, bytes.to_vec()))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> (StatusCode, String) {
    (e.status(), format!("Could not read the upload: {}", e.body_text()))
}

// ============================================================
// HANDLERS
// ============================================================

/// POST /analyze - Acquire the file for the active mode, dispatch it and
/// render the result. No file means an empty fragment and no dispatch.
pub async fn analyze(State(state): State<AppState>, headers: HeaderMap, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err((status, message)) => return render(status, ResultTemplate::notice(message)),
    };

    let mut lifecycle = Lifecycle::new();

    let submission = match acquire(form.mode, form.upload, form.capture) {
        Ok(Some(submission)) => submission,
        Ok(None) => return Html(String::new()).into_response(),
        Err(e) => return render(StatusCode::OK, ResultTemplate::notice(e.to_string())),
    };
    if let Err(e) = lifecycle.acquired() {
        return render(StatusCode::INTERNAL_SERVER_ERROR, ResultTemplate::notice(e.to_string()));
    }

    let session = session_id(&headers).unwrap_or_else(new_session_id);
    let Some(_in_flight) = state.sessions.try_begin(&session) else {
        return render(StatusCode::CONFLICT, ResultTemplate::notice(BUSY_NOTICE));
    };

    info!(
        session = %session,
        source = submission.source.as_str(),
        mime = submission.content_type(),
        size = submission.size(),
        "Analyzing submission"
    );

    let preview = preview_for(&submission);
    let result = match dispatch(&state, &mut lifecycle, &submission).await {
        Ok(result) => result,
        Err(e) => return render(StatusCode::INTERNAL_SERVER_ERROR, ResultTemplate::notice(e.to_string())),
    };

    let (preview_image, notice) = match preview {
        Preview::Image { data_url } => (Some(data_url), None),
        other => (None, other.notice().map(str::to_string)),
    };

    render(
        StatusCode::OK,
        ResultTemplate {
            preview_image,
            notice,
            status: Some(STATUS_COMPLETE),
            body_html: render_markdown(&result.text()),
            is_error: result.is_error(),
        },
    )
}

// ============================================================
// HELPERS
// ============================================================

async fn dispatch(
    state: &AppState,
    lifecycle: &mut Lifecycle,
    submission: &iwa_core::Submission,
) -> IwaResult<iwa_core::AnalysisResult> {
    lifecycle.dispatching()?;
    let result = state.analyzer.analyze_submission(submission).await;
    lifecycle.rendered()?;
    Ok(result)
}

fn render(status: StatusCode, template: ResultTemplate) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => template_error(e),
    }
}
