use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    activities::{
        dto::{ActivityFilter, UserQuery},
        repo_types::Activity,
        validation::{validate_new, validate_patch},
    },
    error::{method_not_allowed, ApiError, ApiResult},
    state::AppState,
};

pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/activities",
            get(list_activities)
                .post(create_activity)
                .fallback(method_not_allowed),
        )
        .route(
            "/activities/:id",
            get(get_activity)
                .put(update_activity)
                .delete(delete_activity)
                .fallback(method_not_allowed),
        )
}

/// An id that is not an integer can never match a row.
fn activity_id(path: Result<Path<String>, PathRejection>) -> ApiResult<i64> {
    let Path(raw) = path.map_err(|_| ApiError::NotFound("Not found".into()))?;
    raw.parse().map_err(|_| ApiError::activity_not_found(&raw))
}

#[instrument(skip(state))]
pub async fn list_activities(
    State(state): State<AppState>,
    filter: Result<Query<ActivityFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Activity>>> {
    let Query(filter) = filter?;
    let filter = filter.normalized();
    let activities = state.store.list(&filter).await?;
    Ok(Json(activities))
}

#[instrument(skip(state, payload))]
pub async fn create_activity(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let Json(body) = payload?;
    let mut new = validate_new(&body)?;
    new.user_id = query.user_id();

    let activity = state.store.insert(new).await?;
    info!(id = activity.id, name = %activity.name, "activity created");

    let location = format!("/api/activities/{}", activity.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(activity)).into_response())
}

#[instrument(skip(state))]
pub async fn get_activity(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Activity>> {
    let id = activity_id(path)?;
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::activity_not_found(id))
}

#[instrument(skip(state, payload))]
pub async fn update_activity(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Activity>> {
    let id = activity_id(path)?;
    let Json(body) = payload?;
    let patch = validate_patch(&body)?;

    let activity = state
        .store
        .update(id, patch)
        .await?
        .ok_or_else(|| ApiError::activity_not_found(id))?;
    info!(id, name = %activity.name, "activity updated");
    Ok(Json(activity))
}

#[instrument(skip(state))]
pub async fn delete_activity(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = activity_id(path)?;
    if !state.store.delete(id).await? {
        return Err(ApiError::activity_not_found(id));
    }
    info!(id, "activity deleted");
    Ok(StatusCode::NO_CONTENT)
}
