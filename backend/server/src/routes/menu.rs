use std::sync::Arc;

use axum::{extract::State, response::Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{
    error::{AppError, OrInternal},
    extract::{AppJson, AppPath},
    models::{
        CreatedId, DEFAULT_DISPLAY_ORDER, DEFAULT_LOW_STOCK_THRESHOLD, MenuItem, MenuItemInput,
        ReorderEntry, non_empty,
    },
    routes::{created, done, ok},
    state::AppState,
};

const MENU_SELECT: &str = "
    SELECT
        m.id, m.title, m.description, m.category, m.tag, m.image_url,
        m.display_order, m.is_active, m.created_at, m.updated_at,
        i.current_stock, i.low_stock_threshold, i.is_sold_out
    FROM menu_items m
    LEFT JOIN inventory i ON m.id = i.menu_item_id
";

struct ValidMenuItem {
    title: String,
    description: String,
    category: String,
    tag: Option<String>,
    image_url: Option<String>,
    display_order: Option<i64>,
    is_active: bool,
}

fn validate(input: MenuItemInput) -> Result<ValidMenuItem, AppError> {
    let (Some(title), Some(description), Some(category)) = (
        non_empty(input.title),
        non_empty(input.description),
        non_empty(input.category),
    ) else {
        return Err(AppError::malformed("Missing required fields"));
    };

    Ok(ValidMenuItem {
        title,
        description,
        category,
        tag: non_empty(input.tag),
        image_url: non_empty(input.image_url),
        display_order: input.display_order,
        is_active: input.is_active.unwrap_or(true),
    })
}

pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let items = sqlx::query_as::<_, MenuItem>(&format!(
        "{MENU_SELECT} ORDER BY m.display_order ASC, m.id ASC"
    ))
    .fetch_all(&state.pool)
    .await
    .or_internal("Failed to fetch menu items")?;

    Ok(ok(items))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<MenuItemInput>,
) -> Result<Response, AppError> {
    const OPERATION: &str = "Failed to create menu item";

    let item = validate(payload)?;

    let mut tx = state.pool.begin().await.or_internal(OPERATION)?;

    let id = sqlx::query(
        "INSERT INTO menu_items (title, description, category, tag, image_url, display_order, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.category)
    .bind(&item.tag)
    .bind(&item.image_url)
    .bind(item.display_order.unwrap_or(DEFAULT_DISPLAY_ORDER))
    .bind(item.is_active)
    .execute(&mut *tx)
    .await
    .or_internal(OPERATION)?
    .last_insert_rowid();

    sqlx::query(
        "INSERT INTO inventory (menu_item_id, low_stock_threshold, is_sold_out) VALUES (?, ?, 0)",
    )
    .bind(id)
    .bind(DEFAULT_LOW_STOCK_THRESHOLD)
    .execute(&mut *tx)
    .await
    .or_internal(OPERATION)?;

    tx.commit().await.or_internal(OPERATION)?;

    info!(id, title = %item.title, "Created menu item");

    Ok(created(CreatedId { id }))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Response, AppError> {
    let item = sqlx::query_as::<_, MenuItem>(&format!("{MENU_SELECT} WHERE m.id = ?"))
        .bind(id)
        .fetch_optional(&state.pool)
        .await
        .or_internal("Failed to fetch item")?
        .ok_or(AppError::NotFound("Item not found"))?;

    Ok(ok(item))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<MenuItemInput>,
) -> Result<Response, AppError> {
    let item = validate(payload)?;

    let result = sqlx::query(
        "UPDATE menu_items
         SET title = ?, description = ?, category = ?, tag = ?, image_url = ?,
             display_order = COALESCE(?, display_order), is_active = ?,
             updated_at = datetime('now')
         WHERE id = ?",
    )
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.category)
    .bind(&item.tag)
    .bind(&item.image_url)
    .bind(item.display_order)
    .bind(item.is_active)
    .bind(id)
    .execute(&state.pool)
    .await
    .or_internal("Failed to update item")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Item not found"));
    }

    info!(id, "Updated menu item");

    Ok(done("Item updated successfully"))
}

/// Inventory and schedules go with it through the foreign keys.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Response, AppError> {
    sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await
        .or_internal("Failed to delete item")?;

    info!(id, "Deleted menu item");

    Ok(done("Item deleted successfully"))
}

fn parse_order(payload: &Value) -> Result<Vec<ReorderEntry>, AppError> {
    payload
        .get("order")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::malformed("Invalid order data"))?
        .iter()
        .map(|entry| ReorderEntry::deserialize(entry))
        .collect::<Result<_, _>>()
        .map_err(|_| AppError::malformed("Invalid order data"))
}

pub async fn reorder_items(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<Value>,
) -> Result<Response, AppError> {
    const OPERATION: &str = "Failed to update order";

    let order = parse_order(&payload)?;

    let mut tx = state.pool.begin().await.or_internal(OPERATION)?;

    for entry in &order {
        sqlx::query(
            "UPDATE menu_items SET display_order = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(entry.display_order)
        .bind(entry.id)
        .execute(&mut *tx)
        .await
        .or_internal(OPERATION)?;
    }

    tx.commit().await.or_internal(OPERATION)?;

    info!(items = order.len(), "Reordered menu");

    Ok(done("Order updated successfully"))
}
