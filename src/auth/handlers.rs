use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, ForgetPasswordRequest, LoginRequest, MessageResponse, SignupRequest},
        extractors::CurrentUser,
        gate::{require_session, TOKEN_COOKIE},
        services::{self, Authenticated},
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let session = Router::new()
        .route("/logout", post(logout))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/forget_password", put(forget_password))
        .merge(session)
}

fn token_cookie(state: &AppState, token: &str) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.keys.ttl_seconds()))
        .build()
}

fn respond(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    msg: &str,
    auth: Authenticated,
) -> (StatusCode, CookieJar, Json<AuthResponse>) {
    let jar = jar.add(token_cookie(state, &auth.token));
    (
        status,
        jar,
        Json(AuthResponse {
            success: true,
            msg: msg.into(),
            token: auth.token,
            user: auth.user,
        }),
    )
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let auth = services::login(&state, &payload.email, &payload.password).await?;
    Ok(respond(&state, jar, StatusCode::OK, "Login successful", auth))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let auth = services::signup(&state, payload).await?;
    Ok(respond(&state, jar, StatusCode::CREATED, "Signup successful", auth))
}

#[instrument(skip(jar))]
pub async fn logout(
    CurrentUser(identity): CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!(user_id = identity.user_id, "user logged out");
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Json(MessageResponse::ok("Logout successful")))
}

#[instrument(skip(state, payload))]
pub async fn forget_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ForgetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::reset_password(&state, &payload.email, payload.password).await?;
    Ok(Json(MessageResponse::ok("Password reset successfully")))
}
