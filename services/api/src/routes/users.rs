//! `/api/users` endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{ApiError, ApiResult},
    models::{UserInput, UserResponse},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Create a new user; a taken email is a bad request here
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<UserInput>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_service
        .create(payload)
        .await
        .map_err(ApiError::duplicate_as_bad_request)?;

    let location = format!("/api/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user)),
    ))
}

/// Get all users, or 204 when there are none
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Response> {
    let users = state.user_service.find_all().await?;

    if users.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users).into_response())
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.find_by_id(id).await?;
    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UserInput>, ApiError>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.update(id, payload).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<StatusCode> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
