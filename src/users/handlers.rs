use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{SetAdminRequest, UpdateProfileRequest, UserResponse, UsersResponse};
use crate::{
    auth::{
        extractors::CurrentUser,
        gate::{require_admin, require_session},
        repo_types::ProfileChanges,
        services::MIN_PASSWORD_LEN,
    },
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn user_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/user", get(list_users))
        .route("/user/:id", get(get_user).delete(delete_user))
        .route("/user/isAdmin/:id", put(set_admin))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/user/profile", get(get_profile).put(update_profile))
        .merge(admin)
        .route_layer(from_fn_with_state(state.clone(), require_session))
}

fn valid_id(id: i64) -> Result<i64, AppError> {
    if id <= 0 {
        return Err(AppError::invalid_input("Invalid user id"));
    }
    Ok(id)
}

fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if v.is_empty() => Err(AppError::invalid_input(format!("{field} must not be empty"))),
        other => Ok(other),
    }
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(UsersResponse {
        success: true,
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User does not exist"))?;
    Ok(Json(UserResponse {
        success: true,
        msg: "Profile".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let gender = non_blank("gender", payload.gender)?;
    if gender.as_deref().is_some_and(|g| g.eq_ignore_ascii_case("select")) {
        return Err(AppError::invalid_input("Please fill all the fields"));
    }

    let password_hash = match payload.password {
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Some(p) => Some(state.passwords.hash(p).await.map_err(AppError::fault)?),
        None => None,
    };

    let changes = ProfileChanges {
        name: non_blank("name", payload.name)?,
        password_hash,
        city: payload.city.map(|c| c.trim().to_owned()),
        dob: payload.dob,
        phone: payload.phone.map(|p| p.trim().to_owned()),
        gender,
    };

    let user = state
        .users
        .update_profile(identity.user_id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("User does not exist"))?;
    info!(user_id = user.id, "profile updated");
    Ok(Json(UserResponse {
        success: true,
        msg: "Profile updated".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_by_id(valid_id(id)?)
        .await?
        .ok_or_else(|| AppError::not_found("User does not exist"))?;
    Ok(Json(UserResponse {
        success: true,
        msg: "User".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .delete(valid_id(id)?)
        .await?
        .ok_or_else(|| AppError::not_found("User does not exist"))?;
    info!(user_id = user.id, by = identity.user_id, "user deleted");
    Ok(Json(UserResponse {
        success: true,
        msg: "Deleted successfully".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn set_admin(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<SetAdminRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let id = valid_id(id)?;
    let Some(user) = state.users.set_admin(id, payload.admin).await? else {
        warn!(user_id = id, "role update for missing user");
        return Err(AppError::not_found("User does not exist"));
    };
    info!(user_id = user.id, admin = user.admin, by = identity.user_id, "role updated");
    Ok(Json(UserResponse {
        success: true,
        msg: "Role updated".into(),
        user: user.into(),
    }))
}
