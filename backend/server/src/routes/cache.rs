use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    cdn::PurgeOutcome,
    error::{AppError, OrInternal},
    models::CacheVersion,
    routes::respond,
    state::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurgeReport {
    #[serde(flatten)]
    version: CacheVersion,
    cloudflare_cleared: bool,
}

/// Bumps the cache version, then asks the CDN to drop everything.
///
/// The version bump is what the storefront keys its cache on. A CDN failure
/// only shows up as `cloudflareCleared: false`.
pub async fn purge_cache(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let version = sqlx::query_as::<_, CacheVersion>(
        "UPDATE cache_version
         SET version = version + 1, last_cleared = datetime('now')
         WHERE id = 1
         RETURNING version, last_cleared",
    )
    .fetch_one(&state.pool)
    .await
    .or_internal("Failed to clear cache")?;

    info!(version = version.version, "Cache version bumped");

    let cloudflare_cleared = match state.cdn.purge_everything().await {
        Ok(PurgeOutcome::Purged) => true,
        Ok(PurgeOutcome::NotConfigured) => false,
        Err(e) => {
            warn!(error = %e, "Failed to purge CDN cache");
            false
        }
    };

    Ok(respond(
        StatusCode::OK,
        PurgeReport {
            version,
            cloudflare_cleared,
        },
        Some("Cache cleared successfully"),
    ))
}
