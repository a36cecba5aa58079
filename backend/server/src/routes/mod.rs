use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub mod batches;
pub mod cache;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod schedules;
pub mod session;
pub mod upload;

/// Body shared by every admin response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope<()> {
    pub fn failure(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message,
        }
    }
}

pub fn respond<T: Serialize>(status: StatusCode, data: T, message: Option<&str>) -> Response {
    let body = Envelope {
        success: true,
        data: Some(data),
        error: None,
        message: message.map(str::to_string),
    };

    (status, Json(body)).into_response()
}

pub fn ok<T: Serialize>(data: T) -> Response {
    respond(StatusCode::OK, data, None)
}

pub fn created<T: Serialize>(data: T) -> Response {
    respond(StatusCode::CREATED, data, None)
}

pub fn done(message: &str) -> Response {
    let body = Envelope::<()> {
        success: true,
        data: None,
        error: None,
        message: Some(message.to_string()),
    };

    (StatusCode::OK, Json(body)).into_response()
}
