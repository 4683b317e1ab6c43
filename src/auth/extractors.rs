use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::{claims::Identity, gate::AUTH_REQUIRED};
use crate::error::AppError;

/// Identity placed on the request by the session gate.
///
/// Only usable on routes behind `require_session`; anywhere else it rejects
/// with 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))
    }
}
