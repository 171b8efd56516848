//! HTML error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

/// Renders `templates/error.html` with the given status.
pub fn error_page(status: StatusCode, message: impl Into<String>) -> Response {
    let page = ErrorTemplate {
        status: status.as_u16(),
        message: message.into(),
    };
    (status, page).into_response()
}

impl AppError {
    /// HTML rendering for browser routes; JSON routes use `IntoResponse`.
    pub fn into_page(self) -> Response {
        error_page(self.status_code(), self.to_string())
    }
}
