//! Request session
//!
//! Resolves who is answering from the request: the cookie named in the server
//! configuration, then the `x-user-id` header. Neither being present means an
//! anonymous session; the question API decides what to do with that.

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;

use super::AppState;
use crate::services::StaticSession;

/// Header consulted when the session cookie is absent
pub const USER_ID_HEADER: &str = "x-user-id";

/// Session resolved from request headers
#[derive(Debug, Clone)]
pub struct RequestSession(pub StaticSession);

impl FromRequestParts<AppState> for RequestSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(session_from_headers(&parts.headers, &state.session_cookie)))
    }
}

/// Build the session for a request from its headers
pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> StaticSession {
    let user_id = user_id_from_cookie(headers, cookie_name).or_else(|| {
        headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
    });
    StaticSession::from_user_id(user_id)
}

fn user_id_from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookie| cookie.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name != cookie_name {
                return None;
            }
            let value = urlencoding::decode(value).ok()?;
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
}
