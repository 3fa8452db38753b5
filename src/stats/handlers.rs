use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    activities::dto::{ActivityFilter, UserQuery},
    error::{method_not_allowed, ApiResult},
    state::AppState,
    stats::{dto::ActivityStats, services::summarize},
};

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats).fallback(method_not_allowed))
}

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<ActivityStats>> {
    let Query(query) = query?;
    let filter = ActivityFilter::for_user(query.user_id());
    let activities = state.store.list(&filter).await?;
    let stats = summarize(&activities);
    debug!(total = stats.total_activities, "stats computed");
    Ok(Json(stats))
}
