//! `/api/todos` endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{ApiError, ApiResult},
    models::{Status, ToDo, ToDoInput, ToDoResponse},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_todo))
        .route("/:id", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/user/:user_id", get(get_todos_by_user))
        .route("/status/:status", get(get_todos_by_status))
}

fn to_responses(todos: Vec<ToDo>) -> Vec<ToDoResponse> {
    todos.into_iter().map(ToDoResponse::from).collect()
}

/// Create a todo from query parameters:
/// `title`, `description?`, `status`, `dueDate` (dd/MM/yyyy), `userId`, `categoryId?`
pub async fn create_todo(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ToDoInput>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let todo = state.todo_service.create(params).await?;

    let location = format!("/api/todos/{}", todo.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ToDoResponse::from(todo)),
    ))
}

pub async fn get_todo(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ToDoResponse>> {
    let todo = state.todo_service.find_by_id(id).await?;
    Ok(Json(todo.into()))
}

/// Todos of a user; an empty list when there are none
pub async fn get_todos_by_user(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<Vec<ToDoResponse>>> {
    let todos = state.todo_service.find_by_user_id(user_id).await?;
    Ok(Json(to_responses(todos)))
}

/// Todos carrying a status; an empty list when there are none
pub async fn get_todos_by_status(
    State(state): State<AppState>,
    WithRejection(Path(status), _): WithRejection<Path<Status>, ApiError>,
) -> ApiResult<Json<Vec<ToDoResponse>>> {
    let todos = state.todo_service.find_by_status(status).await?;
    Ok(Json(to_responses(todos)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<ToDoInput>, ApiError>,
) -> ApiResult<Json<ToDoResponse>> {
    let todo = state.todo_service.update(id, payload).await?;
    Ok(Json(todo.into()))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<StatusCode> {
    state.todo_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
