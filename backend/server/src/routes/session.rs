use std::sync::Arc;

use axum::{extract::State, http::header::SET_COOKIE, response::IntoResponse, response::Response};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    auth::{cleared_session_cookie, session_cookie},
    error::AppError,
    extract::AppJson,
    routes::done,
    state::AppState,
    utils::constant_time_eq,
};

#[derive(Deserialize)]
pub struct Login {
    password: Option<String>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<Login>,
) -> Result<Response, AppError> {
    let password = payload
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| AppError::malformed("Password is required"))?;

    if !constant_time_eq(password.as_bytes(), state.config.admin_password.as_bytes()) {
        warn!("Rejected admin login");
        return Err(AppError::Unauthorized("Invalid password"));
    }

    info!("Admin logged in");

    let cookie = session_cookie(state.config.session_timeout);
    Ok(([(SET_COOKIE, cookie)], done("Login successful")).into_response())
}

pub async fn logout() -> Response {
    ([(SET_COOKIE, cleared_session_cookie())], done("Logged out successfully")).into_response()
}
