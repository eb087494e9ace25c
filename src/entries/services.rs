use crate::dates;
use crate::error::ApiError;
use crate::state::AppState;

use super::repo::{self, FoodEntry};

pub struct NewEntryInput {
    pub food: Option<String>,
    pub user_id: Option<String>,
    pub date: Option<String>,
}

/// The one multi-step flow: validate, resolve the day bucket, estimate, then
/// persist. Validation failures return before any estimator or store call;
/// an estimation failure never reaches the store.
pub async fn log_food(state: &AppState, input: NewEntryInput) -> Result<FoodEntry, ApiError> {
    let food = input
        .food
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::missing_body_field("food"))?;
    let user_id = input
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::missing_body_field("userId"))?;
    let date = input
        .date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(dates::current_date_string);

    let macros = state.estimator.estimate(food).await?;

    let entry = FoodEntry::new(user_id, food, date, macros);
    repo::insert(&state.db, &entry)
        .await
        .map_err(ApiError::save_failed)
}
