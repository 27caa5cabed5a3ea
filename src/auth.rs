//! # Authentication
//!
//! Session-token authentication for the job tracker API.
//!
//! Clients present an opaque session token either as `Authorization: Bearer
//! <token>` or in the `job_tracker_session` cookie. Only the lowercase hex
//! SHA-256 digest of a token is stored, in the `sessions` table.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, unauthorized, unauthorized_with_trace_id};
use crate::repositories::SessionRepository;
use crate::server::AppState;
use crate::telemetry::TraceContext;

/// Cookie the page adapter reads the session token from.
pub const SESSION_COOKIE: &str = "job_tracker_session";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Hex-encoded SHA-256 digest of a session token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Generates a fresh 256-bit session token, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Where a presented token was found, or why none was usable.
#[derive(Debug, PartialEq, Eq)]
enum TokenLookup<'a> {
    Found(&'a str),
    Missing,
    Malformed(&'static str),
}

fn extract_token(headers: &HeaderMap) -> TokenLookup<'_> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let Ok(header) = value.to_str() else {
            return TokenLookup::Malformed("Invalid Authorization header");
        };
        return match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => TokenLookup::Found(token.trim()),
            Some(_) => TokenLookup::Malformed("Empty bearer token"),
            None => TokenLookup::Malformed("Authorization header must use Bearer scheme"),
        };
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map_or(TokenLookup::Missing, |(_, value)| TokenLookup::Found(value))
}

/// Resolves the caller behind `headers`, if any.
///
/// Database failures are propagated; an absent, unknown or expired token
/// yields `Ok(None)`.
pub async fn resolve_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, ApiError> {
    let TokenLookup::Found(token) = extract_token(headers) else {
        return Ok(None);
    };

    let session = SessionRepository::new(Arc::clone(&state.db))
        .find_active(&hash_token(token), state.clock.now())
        .await?;

    Ok(session.map(|s| CurrentUser { id: s.user_id }))
}

/// Authentication middleware for the `/api` routes.
///
/// Rejects the request with 401 unless it carries a live session token, and
/// otherwise stores the [`CurrentUser`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let trace_id = request
        .extensions()
        .get::<TraceContext>()
        .map(|ctx| ctx.trace_id.clone());
    let reject = |message: &str| match trace_id.clone() {
        Some(trace_id) => unauthorized_with_trace_id(Some(message), trace_id),
        None => unauthorized(Some(message)),
    };

    if let TokenLookup::Malformed(message) = extract_token(request.headers()) {
        return Err(reject(message));
    }

    let Some(user) = resolve_user(&state, request.headers()).await? else {
        return Err(reject("Missing or expired session"));
    };

    tracing::debug!(user_id = %user.id, "Authenticated request");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| unauthorized(Some("Authentication required")))
    }
}

/// Extractor for routes that serve anonymous callers differently instead of
/// rejecting them.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(Self(Some(*user)));
        }
        resolve_user(state, &parts.headers).await.map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn token_hash_is_lowercase_sha256_hex() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn generated_tokens_are_unique_and_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn bearer_header_takes_precedence_over_cookie() {
        let map = headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "job_tracker_session=cookie-token"),
        ]);
        assert_eq!(extract_token(&map), TokenLookup::Found("header-token"));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let map = headers(&[("cookie", "theme=dark; job_tracker_session=abc123; lang=en")]);
        assert_eq!(extract_token(&map), TokenLookup::Found("abc123"));
    }

    #[test]
    fn non_bearer_schemes_are_malformed() {
        let map = headers(&[("authorization", "Basic dGVzdDoxMjM=")]);
        assert!(matches!(extract_token(&map), TokenLookup::Malformed(_)));

        let map = headers(&[("authorization", "Bearer   ")]);
        assert!(matches!(extract_token(&map), TokenLookup::Malformed(_)));
    }

    #[test]
    fn no_credentials_is_missing() {
        assert_eq!(extract_token(&HeaderMap::new()), TokenLookup::Missing);
        let map = headers(&[("cookie", "job_tracker_session=")]);
        assert_eq!(extract_token(&map), TokenLookup::Missing);
    }
}
