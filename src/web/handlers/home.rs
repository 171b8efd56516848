//! Home page and form-based creation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::state::AppState;

/// Template for the home page.
///
/// Renders `templates/home.html`: a single URL field posting to `/add`,
/// with the previous attempt's error shown inline.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub error: Option<String>,
    pub url: String,
    pub restrict_domain: String,
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub url: String,
}

/// `GET /`
pub async fn home_handler(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        error: None,
        url: String::new(),
        restrict_domain: state.settings.restrict_domain.clone(),
    }
}

/// Creates a short URL from the home page form.
///
/// # Endpoint
///
/// `POST /add` (form field `url`)
///
/// On success redirects with `302 Found` to the stats page `/{code}+`.
/// On failure the home page is rendered again with the error message and
/// the status of the error.
pub async fn add_handler(State(state): State<AppState>, Form(form): Form<AddForm>) -> Response {
    match state
        .link_service
        .create(&form.url, &state.settings.restrict_domain)
        .await
    {
        Ok(short_url) => (
            StatusCode::FOUND,
            [(header::LOCATION, format!("/{}+", short_url.id))],
        )
            .into_response(),
        Err(e) => {
            let page = HomeTemplate {
                error: Some(e.to_string()),
                url: form.url,
                restrict_domain: state.settings.restrict_domain.clone(),
            };
            (e.status_code(), page).into_response()
        }
    }
}
