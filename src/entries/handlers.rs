use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::dates;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{DeleteParams, DeleteResponse, ListParams, LogFoodRequest};
use super::repo::{self, FoodEntry};
use super::services::{self, NewEntryInput};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/logFood",
        post(log_food).get(list_entries).delete(delete_entry),
    )
}

#[instrument(skip(state, body))]
async fn log_food(
    State(state): State<AppState>,
    Json(body): Json<LogFoodRequest>,
) -> Result<Json<FoodEntry>, ApiError> {
    let entry = services::log_food(
        &state,
        NewEntryInput {
            food: body.food,
            user_id: body.user_id,
            date: body.date,
        },
    )
    .await?;
    Ok(Json(entry))
}

#[instrument(skip(state))]
async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<FoodEntry>>, ApiError> {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::missing_param("userId"))?;
    let date = params
        .date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(dates::current_date_string);

    let entries = repo::list_by_user_and_date(&state.db, user_id, &date)
        .await
        .map_err(ApiError::fetch_failed)?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
async fn delete_entry(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::missing_param("id"))?;
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::missing_param("userId"))?;

    // An id that is not a UUID cannot match any row; deleting nothing is
    // still success, same as an unmatched filter.
    let Ok(id) = id.parse::<Uuid>() else {
        warn!(%user_id, id, "delete called with a non-uuid id");
        return Ok(Json(DeleteResponse { success: true }));
    };

    let deleted = repo::delete_by_id_and_user(&state.db, id, user_id)
        .await
        .map_err(ApiError::delete_failed)?;
    if !deleted {
        debug!(%id, %user_id, "no matching entry to delete");
    }
    Ok(Json(DeleteResponse { success: true }))
}
