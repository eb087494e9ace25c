use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::MacroEstimate;

/// One logged food item. `date` is the Pacific civil day bucket; `created_at`
/// is the precise write instant used only for ordering. Rows are never
/// updated; correction is delete + recreate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub description: String,
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl FoodEntry {
    pub fn new(user_id: &str, description: &str, date: String, macros: MacroEstimate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            description: description.to_string(),
            date,
            calories: macros.calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fats: macros.fats,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

pub async fn insert(db: &PgPool, entry: &FoodEntry) -> sqlx::Result<FoodEntry> {
    sqlx::query_as::<_, FoodEntry>(
        r#"
        INSERT INTO food_entries (id, user_id, description, date, calories, protein, carbs, fats, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, description, date, calories, protein, carbs, fats, created_at
        "#,
    )
    .bind(entry.id)
    .bind(&entry.user_id)
    .bind(&entry.description)
    .bind(&entry.date)
    .bind(entry.calories)
    .bind(entry.protein)
    .bind(entry.carbs)
    .bind(entry.fats)
    .bind(entry.created_at)
    .fetch_one(db)
    .await
}

pub async fn list_by_user_and_date(
    db: &PgPool,
    user_id: &str,
    date: &str,
) -> sqlx::Result<Vec<FoodEntry>> {
    sqlx::query_as::<_, FoodEntry>(
        r#"
        SELECT id, user_id, description, date, calories, protein, carbs, fats, created_at
        FROM food_entries
        WHERE user_id = $1 AND date = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
}

/// Single filtered delete scoped by both id and owner; the ownership check is
/// part of the statement, never a separate read. Returns whether a row went.
pub async fn delete_by_id_and_user(db: &PgPool, id: Uuid, user_id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
