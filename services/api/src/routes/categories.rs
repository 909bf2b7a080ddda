//! `/api/categories` endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{ApiError, ApiResult},
    models::{CategoryInput, CategoryResponse},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// Create a new category; a taken name is a conflict
pub async fn create_category(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryInput>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let category = state.category_service.create(payload).await?;

    let location = format!("/api/categories/{}", category.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CategoryResponse::from(category)),
    ))
}

pub async fn get_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.find_all().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Get a category by ID; absence becomes a 404 here
pub async fn get_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = state
        .category_service
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found with id: {}", id)))?;

    Ok(Json(category.into()))
}

pub async fn update_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryInput>, ApiError>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = state.category_service.update(id, payload).await?;
    Ok(Json(category.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<StatusCode> {
    state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
