use std::sync::Arc;

use axum::{extract::State, response::Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use crate::{
    error::{AppError, OrInternal},
    extract::{AppJson, AppPath},
    models::FormValue,
    routes::done,
    state::AppState,
};

fn form_value(value: &Value) -> Result<FormValue, String> {
    FormValue::deserialize(value).map_err(|e| e.to_string())
}

/// Stock fields present in a partial update.
///
/// `current_stock` is doubly optional: `Some(None)` clears the stock back to
/// unlimited, `None` leaves the column alone.
#[derive(Debug, Default, PartialEq)]
pub struct InventoryPatch {
    current_stock: Option<Option<i64>>,
    low_stock_threshold: Option<i64>,
    is_sold_out: Option<bool>,
}

impl InventoryPatch {
    pub fn from_json(payload: &Map<String, Value>) -> Result<Self, AppError> {
        let mut patch = Self::default();

        if let Some(value) = payload.get("currentStock") {
            patch.current_stock = Some(match value {
                Value::Null => None,
                other => form_value(other)
                    .and_then(FormValue::into_count)
                    .map_err(|_| AppError::malformed("currentStock must be an integer"))?,
            });
        }

        if let Some(value) = payload.get("lowStockThreshold") {
            patch.low_stock_threshold = Some(
                form_value(value)
                    .and_then(FormValue::into_count)
                    .ok()
                    .flatten()
                    .ok_or_else(|| AppError::malformed("lowStockThreshold must be an integer"))?,
            );
        }

        if let Some(value) = payload.get("isSoldOut") {
            patch.is_sold_out = Some(
                form_value(value)
                    .and_then(FormValue::into_flag)
                    .map_err(|_| AppError::malformed("isSoldOut must be a boolean"))?,
            );
        }

        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.current_stock.is_none() && self.low_stock_threshold.is_none() && self.is_sold_out.is_none()
    }

    pub fn to_query(&self, menu_item_id: i64) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new("UPDATE inventory SET ");

        {
            let mut fields = query.separated(", ");

            if let Some(current_stock) = self.current_stock {
                fields.push("current_stock = ").push_bind_unseparated(current_stock);
            }

            if let Some(threshold) = self.low_stock_threshold {
                fields.push("low_stock_threshold = ").push_bind_unseparated(threshold);
            }

            if let Some(sold_out) = self.is_sold_out {
                fields.push("is_sold_out = ").push_bind_unseparated(sold_out);
            }

            fields.push("last_updated = datetime('now')");
        }

        query.push(" WHERE menu_item_id = ").push_bind(menu_item_id);

        query
    }
}

pub async fn update_inventory(
    State(state): State<Arc<AppState>>,
    AppPath(menu_item_id): AppPath<i64>,
    AppJson(payload): AppJson<Map<String, Value>>,
) -> Result<Response, AppError> {
    let patch = InventoryPatch::from_json(&payload)?;

    if patch.is_empty() {
        return Err(AppError::malformed("No fields to update"));
    }

    let result = patch
        .to_query(menu_item_id)
        .build()
        .execute(&state.pool)
        .await
        .or_internal("Failed to update inventory")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Inventory not found"));
    }

    info!(menu_item_id, ?patch, "Updated inventory");

    Ok(done("Inventory updated successfully"))
}
