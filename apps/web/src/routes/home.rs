use axum::{extract::State, response::Html};
use minijinja::context;

use crate::errors::AppError;
use crate::state::AppState;

/// GET /
pub async fn home_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.views.render("home.html", context! {})
}
