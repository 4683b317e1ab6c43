use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::dto::{CourseResponse, CoursesResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::{
    auth::{
        extractors::CurrentUser,
        gate::{authorize_admin, require_admin, require_session},
    },
    courses::repo_types::{CourseChanges, NewCourse},
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn course_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/course", get(list_courses).post(create_course))
        .route("/course/:id", put(update_course).delete(delete_course))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/course/user", get(list_user_courses))
        .route("/course/:id", get(get_course))
        .merge(admin)
        .route_layer(from_fn_with_state(state.clone(), require_session))
}

const COURSE_MISSING: &str = "Course does not exist";
const OWNER_MISSING: &str = "User does not exist";

fn check_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid_input(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn check_rating(rating: Option<i32>) -> Result<Option<i32>, AppError> {
    match rating {
        Some(r) if !(0..=5).contains(&r) => {
            Err(AppError::invalid_input("Rating must be between 0 and 5"))
        }
        other => Ok(other),
    }
}

fn check_owner_id(user_id: i64) -> Result<i64, AppError> {
    if user_id <= 0 {
        return Err(AppError::invalid_input("Required a valid user id"));
    }
    Ok(user_id)
}

async fn ensure_owner_exists(state: &AppState, user_id: i64) -> Result<String, AppError> {
    match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(user.name),
        None => {
            warn!(user_id, "course owner does not exist");
            Err(AppError::not_found(OWNER_MISSING))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<CoursesResponse>, AppError> {
    let courses = state.courses.list_all().await?;
    Ok(Json(CoursesResponse {
        success: true,
        courses,
    }))
}

#[instrument(skip(state))]
pub async fn list_user_courses(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<CoursesResponse>, AppError> {
    let courses = state.courses.list_by_user(identity.user_id).await?;
    Ok(Json(CoursesResponse {
        success: true,
        courses,
    }))
}

/// Readable by the owner or by any admin.
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state
        .courses
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found(COURSE_MISSING))?;

    if course.user_id != identity.user_id {
        authorize_admin(&state, identity).await?;
    }

    Ok(Json(CourseResponse {
        success: true,
        msg: "Course".into(),
        course,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    let user_id = check_owner_id(payload.user_id)?;
    let new_course = NewCourse {
        user_id,
        title: check_text("title", &payload.title)?,
        description: payload.description,
        rating: check_rating(payload.rating)?,
        publisher: check_text("publisher", &payload.publisher)?,
        last_update: payload
            .last_update
            .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        upload_date: payload.upload_date,
    };

    let owner_name = ensure_owner_exists(&state, user_id).await?;
    let course = state.courses.create(new_course).await?;
    info!(course_id = course.id, user_id, "course created");

    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            success: true,
            msg: format!("Successfully created course for {owner_name}"),
            course,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    let user_id = payload.user_id.map(check_owner_id).transpose()?;
    let changes = CourseChanges {
        user_id,
        title: payload.title.as_deref().map(|t| check_text("title", t)).transpose()?,
        description: payload.description,
        rating: check_rating(payload.rating)?,
        publisher: payload
            .publisher
            .as_deref()
            .map(|p| check_text("publisher", p))
            .transpose()?,
        last_update: payload.last_update,
        upload_date: payload.upload_date,
    };

    if let Some(owner) = user_id {
        ensure_owner_exists(&state, owner).await?;
    }

    let course = state
        .courses
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found(COURSE_MISSING))?;
    info!(course_id = course.id, "course updated");

    Ok(Json(CourseResponse {
        success: true,
        msg: "Updated successfully".into(),
        course,
    }))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state
        .courses
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found(COURSE_MISSING))?;
    info!(course_id = course.id, "course deleted");

    Ok(Json(CourseResponse {
        success: true,
        msg: "Deleted successfully".into(),
        course,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(check_rating(None).is_ok());
        assert!(check_rating(Some(0)).is_ok());
        assert!(check_rating(Some(5)).is_ok());
        assert!(check_rating(Some(6)).is_err());
        assert!(check_rating(Some(-1)).is_err());
    }

    #[test]
    fn owner_id_must_be_positive() {
        assert!(check_owner_id(0).is_err());
        assert!(check_owner_id(-1).is_err());
        assert_eq!(check_owner_id(3).unwrap(), 3);
    }
}
