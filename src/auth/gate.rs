//! Request gates layered in front of handlers.
//!
//! `require_session` checks the bearer token and attaches an [`Identity`];
//! it never touches the store. `require_admin` must be layered inside it: it
//! reloads the user on every request and lets only current admins through.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::{
    auth::{claims::Identity, jwt::JwtKeys, repo_types::User},
    error::AppError,
    state::AppState,
};

pub const TOKEN_COOKIE: &str = "auth_token";

pub const AUTH_REQUIRED: &str = "Authentication required";
pub const AUTH_INVALID: &str = "Invalid or expired authentication";
pub const ADMIN_DENIED: &str = "Admin resources access denied";

/// Token from `Authorization` (with or without the `Bearer` scheme), else
/// from the token cookie. Blank values count as absent.
pub fn presented_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(strip_scheme)
        .filter(|t| !t.is_empty());
    if let Some(token) = from_header {
        return Some(token.to_owned());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().trim().to_owned())
        .filter(|t| !t.is_empty())
}

fn strip_scheme(value: &str) -> &str {
    let value = value.trim();
    match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    }
}

pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<Identity, AppError> {
    let token = presented_token(headers).ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))?;
    let claims = keys.verify(&token).map_err(|e| {
        warn!(error = %e, "token rejected");
        AppError::unauthorized(AUTH_INVALID)
    })?;
    Ok(Identity::from(&claims))
}

/// Loads the caller's current record and requires `admin`.
pub async fn authorize_admin(state: &AppState, identity: Identity) -> Result<User, AppError> {
    match state.users.find_by_id(identity.user_id).await? {
        Some(user) if user.admin => Ok(user),
        Some(_) => {
            warn!(user_id = identity.user_id, "admin access denied");
            Err(AppError::forbidden(ADMIN_DENIED))
        }
        None => {
            warn!(user_id = identity.user_id, "admin check for missing user");
            Err(AppError::forbidden(ADMIN_DENIED))
        }
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = authenticate(req.headers(), &state.keys)?;
    debug!(user_id = identity.user_id, "session accepted");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .copied()
        .ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))?;
    authorize_admin(&state, identity).await?;
    Ok(next.run(req).await)
}
