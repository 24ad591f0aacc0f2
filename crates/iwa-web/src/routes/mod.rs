//! Route handlers.

pub mod analyze;
pub mod page;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

fn template_error(e: askama::Error) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Template error: {}", e))).into_response()
}
