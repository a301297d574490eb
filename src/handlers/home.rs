use std::collections::HashMap;

use axum::{
    response::{IntoResponse, Redirect},
    routing::get,
    Form, Router,
};
use maud::Markup;

use crate::rejections::AppError;
use crate::{names, views, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::HOME_URL, get(home).post(go_to_survey))
}

async fn home() -> Markup {
    views::page("Welcome", views::survey::home())
}

async fn go_to_survey(
    Form(data): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let slug = data
        .get(names::SLUG_FIELD_NAME)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or(AppError::Input("missing survey code"))?;

    Ok(Redirect::to(&names::start_url(slug)))
}
