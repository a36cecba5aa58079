use std::sync::Arc;

use axum::{extract::State, response::Response};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::{
    error::{AppError, OrInternal},
    extract::{AppJson, AppPath},
    models::{BatchInput, BatchStatus, BatchSummary, PickupBatch, UNLIMITED_SNAPSHOT_STOCK, non_empty},
    routes::{created, ok},
    state::AppState,
};

struct ValidBatch {
    name: String,
    pickup_date: NaiveDate,
    pickup_time_start: String,
    pickup_time_end: String,
    cutoff_date: DateTime<Utc>,
    max_capacity: Option<i64>,
    status: BatchStatus,
}

#[derive(Serialize)]
struct BatchCreated {
    id: i64,
    message: &'static str,
}

#[derive(Serialize)]
struct BatchMessage {
    message: &'static str,
}

fn validate(input: BatchInput) -> Result<ValidBatch, AppError> {
    let (Some(name), Some(pickup_date), Some(pickup_time_start), Some(pickup_time_end), Some(cutoff_date)) = (
        non_empty(input.name),
        input.pickup_date,
        non_empty(input.pickup_time_start),
        non_empty(input.pickup_time_end),
        input.cutoff_date,
    ) else {
        return Err(AppError::malformed("Missing required fields"));
    };

    if input.max_capacity.is_some_and(|capacity| capacity < 0) {
        return Err(AppError::malformed("maxCapacity must not be negative"));
    }

    Ok(ValidBatch {
        name,
        pickup_date,
        pickup_time_start,
        pickup_time_end,
        cutoff_date,
        max_capacity: input.max_capacity,
        status: input.status.unwrap_or_default(),
    })
}

pub async fn list_batches(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let batches = sqlx::query_as::<_, BatchSummary>(
        "SELECT pb.*, COUNT(DISTINCT o.id) AS order_count
         FROM pickup_batches pb
         LEFT JOIN orders o ON pb.id = o.batch_id AND o.status != 'cancelled'
         GROUP BY pb.id
         ORDER BY pb.pickup_date DESC, pb.id DESC",
    )
    .fetch_all(&state.pool)
    .await
    .or_internal("Failed to fetch batches")?;

    Ok(ok(batches))
}

/// Inserts the batch and copies every active item's stock into its snapshot.
pub async fn create_batch(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<BatchInput>,
) -> Result<Response, AppError> {
    const OPERATION: &str = "Failed to create batch";

    let batch = validate(payload)?;

    let mut tx = state.pool.begin().await.or_internal(OPERATION)?;

    let id = sqlx::query(
        "INSERT INTO pickup_batches (
            name, pickup_date, pickup_time_start, pickup_time_end,
            cutoff_date, max_capacity, status
         ) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&batch.name)
    .bind(batch.pickup_date)
    .bind(&batch.pickup_time_start)
    .bind(&batch.pickup_time_end)
    .bind(batch.cutoff_date)
    .bind(batch.max_capacity)
    .bind(batch.status)
    .execute(&mut *tx)
    .await
    .or_internal(OPERATION)?
    .last_insert_rowid();

    let snapshot = sqlx::query(
        "INSERT INTO batch_inventory_snapshot (batch_id, menu_item_id, available_quantity, reserved_quantity)
         SELECT ?, mi.id, COALESCE(inv.current_stock, ?), 0
         FROM menu_items mi
         LEFT JOIN inventory inv ON mi.id = inv.menu_item_id
         WHERE mi.is_active = 1",
    )
    .bind(id)
    .bind(UNLIMITED_SNAPSHOT_STOCK)
    .execute(&mut *tx)
    .await
    .or_internal(OPERATION)?;

    tx.commit().await.or_internal(OPERATION)?;

    info!(
        id,
        name = %batch.name,
        snapshot_rows = snapshot.rows_affected(),
        "Created pickup batch"
    );

    Ok(created(BatchCreated {
        id,
        message: "Batch created successfully",
    }))
}

pub async fn get_batch(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Response, AppError> {
    let batch = sqlx::query_as::<_, PickupBatch>("SELECT * FROM pickup_batches WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.pool)
        .await
        .or_internal("Failed to fetch batch")?
        .ok_or(AppError::NotFound("Batch not found"))?;

    Ok(ok(batch))
}

pub async fn update_batch(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<BatchInput>,
) -> Result<Response, AppError> {
    let batch = validate(payload)?;

    let result = sqlx::query(
        "UPDATE pickup_batches
         SET name = ?, pickup_date = ?, pickup_time_start = ?, pickup_time_end = ?,
             cutoff_date = ?, max_capacity = ?, status = ?,
             updated_at = datetime('now')
         WHERE id = ?",
    )
    .bind(&batch.name)
    .bind(batch.pickup_date)
    .bind(&batch.pickup_time_start)
    .bind(&batch.pickup_time_end)
    .bind(batch.cutoff_date)
    .bind(batch.max_capacity)
    .bind(batch.status)
    .bind(id)
    .execute(&state.pool)
    .await
    .or_internal("Failed to update batch")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Batch not found"));
    }

    info!(id, status = ?batch.status, "Updated pickup batch");

    Ok(ok(BatchMessage {
        message: "Batch updated successfully",
    }))
}

/// Refused while any order, cancelled or not, points at the batch.
pub async fn delete_batch(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Response, AppError> {
    const OPERATION: &str = "Failed to delete batch";

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE batch_id = ?")
        .bind(id)
        .fetch_one(&state.pool)
        .await
        .or_internal(OPERATION)?;

    if orders > 0 {
        return Err(AppError::malformed("Cannot delete batch with existing orders"));
    }

    sqlx::query("DELETE FROM pickup_batches WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await
        .or_internal(OPERATION)?;

    info!(id, "Deleted pickup batch");

    Ok(ok(BatchMessage {
        message: "Batch deleted successfully",
    }))
}
