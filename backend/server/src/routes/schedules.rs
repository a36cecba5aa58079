use std::sync::Arc;

use axum::{extract::State, response::Response};
use tracing::info;

use crate::{
    error::{AppError, OrInternal},
    extract::{AppJson, AppPath, AppQuery},
    models::{CreatedId, Schedule, ScheduleInput, ScheduleQuery, non_empty},
    routes::{created, done, ok},
    state::AppState,
};

struct ScheduleWindow {
    day_of_week: Option<i64>,
    start_time: Option<String>,
    end_time: Option<String>,
    is_active: bool,
}

/// Days run 0 (Sunday) through 6. Overlapping windows are allowed.
fn window(input: &ScheduleInput) -> Result<ScheduleWindow, AppError> {
    if let Some(day) = input.day_of_week {
        if !(0..=6).contains(&day) {
            return Err(AppError::malformed("dayOfWeek must be between 0 and 6"));
        }
    }

    Ok(ScheduleWindow {
        day_of_week: input.day_of_week,
        start_time: non_empty(input.start_time.clone()),
        end_time: non_empty(input.end_time.clone()),
        is_active: input.is_active.unwrap_or(true),
    })
}

pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ScheduleQuery>,
) -> Result<Response, AppError> {
    let item_id = query
        .item_id
        .ok_or_else(|| AppError::malformed("itemId query parameter is required"))?;

    let schedules = sqlx::query_as::<_, Schedule>(
        "SELECT id, menu_item_id, day_of_week, start_time, end_time, is_active, created_at
         FROM menu_schedules
         WHERE menu_item_id = ?
         ORDER BY day_of_week, start_time",
    )
    .bind(item_id)
    .fetch_all(&state.pool)
    .await
    .or_internal("Failed to fetch schedules")?;

    Ok(ok(schedules))
}

pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<ScheduleInput>,
) -> Result<Response, AppError> {
    let menu_item_id = payload
        .menu_item_id
        .ok_or_else(|| AppError::malformed("menuItemId is required"))?;
    let window = window(&payload)?;

    let id = sqlx::query(
        "INSERT INTO menu_schedules (menu_item_id, day_of_week, start_time, end_time, is_active)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(menu_item_id)
    .bind(window.day_of_week)
    .bind(&window.start_time)
    .bind(&window.end_time)
    .bind(window.is_active)
    .execute(&state.pool)
    .await
    .or_internal("Failed to create schedule")?
    .last_insert_rowid();

    info!(id, menu_item_id, "Created schedule");

    Ok(created(CreatedId { id }))
}

pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ScheduleInput>,
) -> Result<Response, AppError> {
    let window = window(&payload)?;

    let result = sqlx::query(
        "UPDATE menu_schedules
         SET day_of_week = ?, start_time = ?, end_time = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(window.day_of_week)
    .bind(&window.start_time)
    .bind(&window.end_time)
    .bind(window.is_active)
    .bind(id)
    .execute(&state.pool)
    .await
    .or_internal("Failed to update schedule")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Schedule not found"));
    }

    Ok(done("Schedule updated successfully"))
}

pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Response, AppError> {
    sqlx::query("DELETE FROM menu_schedules WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await
        .or_internal("Failed to delete schedule")?;

    Ok(done("Schedule deleted successfully"))
}
