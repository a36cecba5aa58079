//! # Admin Session
//!
//! One shared password, one unsigned cookie.
//!
//! - Login compares the submitted password with the configured secret
//! - Success sets `admin_session=authenticated` with `Max-Age` from config
//! - Every other admin route checks for that exact cookie pair
//! - No server-side session store, expiry is whatever the browser enforces
//! - Logout overwrites the cookie with an empty value and `Max-Age=0`
//!
//! The check sits behind `SessionValidator` so a signed-token scheme can
//! replace the marker without touching the routes.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

pub const SESSION_COOKIE_NAME: &str = "admin_session";
pub const SESSION_VALUE: &str = "authenticated";

pub trait SessionValidator: Send + Sync {
    /// `cookie_header` is every `Cookie` header of the request joined by `; `.
    fn is_authenticated(&self, cookie_header: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CookieMarker;

impl SessionValidator for CookieMarker {
    fn is_authenticated(&self, cookie_header: &str) -> bool {
        cookie_header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name == SESSION_COOKIE_NAME && value == SESSION_VALUE)
    }
}

pub fn session_cookie(max_age: u64) -> String {
    format!(
        "{SESSION_COOKIE_NAME}={SESSION_VALUE}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={max_age}"
    )
}

pub fn cleared_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0")
}

fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let cookies = cookie_header(request.headers());

    if !state.sessions.is_authenticated(&cookies) {
        return AppError::Unauthorized("Unauthorized").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_marker_accepted() {
        assert!(CookieMarker.is_authenticated("admin_session=authenticated"));
        assert!(CookieMarker.is_authenticated("theme=dark; admin_session=authenticated; lang=en"));
    }

    #[test]
    fn test_marker_rejected() {
        assert!(!CookieMarker.is_authenticated(""));
        assert!(!CookieMarker.is_authenticated("admin_session="));
        assert!(!CookieMarker.is_authenticated("admin_session=authenticated-not"));
        assert!(!CookieMarker.is_authenticated("x_admin_session=authenticated"));
        assert!(!CookieMarker.is_authenticated("admin_session=Authenticated"));
    }

    #[test]
    fn test_cookie_headers_joined() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("admin_session=authenticated"));

        let joined = cookie_header(&headers);
        assert_eq!(joined, "theme=dark; admin_session=authenticated");
        assert!(CookieMarker.is_authenticated(&joined));
    }

    #[test]
    fn test_cookie_strings() {
        assert_eq!(
            session_cookie(86400),
            "admin_session=authenticated; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=86400"
        );
        assert!(cleared_session_cookie().starts_with("admin_session=;"));
        assert!(cleared_session_cookie().ends_with("Max-Age=0"));
    }
}
