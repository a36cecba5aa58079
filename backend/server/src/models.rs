use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use sqlx::FromRow;

pub const DEFAULT_DISPLAY_ORDER: i64 = 999;
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;
/// Snapshot quantity for items that track no stock.
pub const UNLIMITED_SNAPSHOT_STOCK: i64 = 999;

/// A form value as the admin panel posts it: checkboxes and selects arrive as
/// `0`/`1`, number inputs as their raw text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl FormValue {
    pub fn into_flag(self) -> Result<bool, String> {
        match self {
            FormValue::Flag(flag) => Ok(flag),
            FormValue::Number(number) => Ok(number != 0),
            FormValue::Text(text) => match text.trim() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                other => Err(format!("expected a boolean, got {other:?}")),
            },
        }
    }

    /// Blank text reads as no value.
    pub fn into_count(self) -> Result<Option<i64>, String> {
        match self {
            FormValue::Number(number) => Ok(Some(number)),
            FormValue::Text(text) if text.trim().is_empty() => Ok(None),
            FormValue::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| format!("expected an integer, got {text:?}")),
            FormValue::Flag(flag) => Err(format!("expected an integer, got {flag}")),
        }
    }
}

fn form_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Option::<FormValue>::deserialize(deserializer)?
        .map(FormValue::into_flag)
        .transpose()
        .map_err(D::Error::custom)
}

fn form_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<FormValue>::deserialize(deserializer)?
        .map(FormValue::into_count)
        .transpose()
        .map_err(D::Error::custom)?
        .flatten())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Open,
    Closed,
    Fulfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Fulfilled,
    Cancelled,
}

/// Stock columns of a left-joined inventory row, all null when the row is absent.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevels {
    pub current_stock: Option<i64>,
    pub low_stock_threshold: Option<i64>,
    pub is_sold_out: Option<bool>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tag: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[sqlx(flatten)]
    pub inventory: InventoryLevels,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "form_count")]
    pub display_order: Option<i64>,
    #[serde(default, deserialize_with = "form_flag")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderEntry {
    pub id: i64,
    pub display_order: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub menu_item_id: i64,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    #[serde(default, deserialize_with = "form_count")]
    pub menu_item_id: Option<i64>,
    #[serde(default, deserialize_with = "form_count")]
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "form_flag")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    pub item_id: Option<i64>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PickupBatch {
    pub id: i64,
    pub name: String,
    pub pickup_date: NaiveDate,
    pub pickup_time_start: String,
    pub pickup_time_end: String,
    pub cutoff_date: DateTime<Utc>,
    pub max_capacity: Option<i64>,
    pub status: BatchStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub batch: PickupBatch,
    /// Orders that are not cancelled.
    pub order_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    pub name: Option<String>,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time_start: Option<String>,
    pub pickup_time_end: Option<String>,
    pub cutoff_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "form_count")]
    pub max_capacity: Option<i64>,
    pub status: Option<BatchStatus>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: i64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub batch_name: String,
    pub pickup_date: NaiveDate,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CacheVersion {
    #[serde(rename = "cacheVersion")]
    pub version: i64,
    #[serde(rename = "timestamp")]
    pub last_cleared: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedId {
    pub id: i64,
}

/// Returns the trimmed value, or `None` when absent or blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
