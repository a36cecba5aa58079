use std::sync::Arc;

use axum::{extract::State, response::Response};

use crate::{
    error::{AppError, OrInternal},
    models::OrderSummary,
    routes::ok,
    state::AppState,
};

/// Newest first. The admin panel filters client-side.
pub async fn list_orders(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let orders = sqlx::query_as::<_, OrderSummary>(
        "SELECT
            o.id, o.subtotal, o.tax, o.total, o.status, o.created_at,
            c.first_name || ' ' || c.last_name AS customer_name,
            c.email AS customer_email,
            c.phone AS customer_phone,
            pb.name AS batch_name,
            pb.pickup_date
         FROM orders o
         JOIN customers c ON o.customer_id = c.id
         JOIN pickup_batches pb ON o.batch_id = pb.id
         ORDER BY o.created_at DESC, o.id DESC",
    )
    .fetch_all(&state.pool)
    .await
    .or_internal("Failed to fetch orders")?;

    Ok(ok(orders))
}
