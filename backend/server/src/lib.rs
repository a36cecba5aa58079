//! Admin backend of a small pickup-ordering site.
//!
//! The storefront sells smoked meats in pickup batches. This crate is the
//! back office: the menu, stock levels, weekly availability, batches, the order
//! list, cache invalidation and photo uploads.
//!
//!
//!
//! # General Infrastructure
//! - One axum server, one SQLite file, one image directory
//! - Admin panel is a static bundle served from `STATIC_DIR` at `/`
//! - Uploaded images are written under `IMAGE_DIR` and served at `/images`
//! - A CDN sits in front of the storefront, purged on demand from the panel
//!
//!
//!
//! # Request Flow
//!
//! Router → session check → handler → SQLite / image store / CDN → JSON
//!
//! - Every route under `/api/admin` except `/auth` and `/logout` requires the
//!   session cookie
//! - Handlers never call each other
//! - Responses share one envelope: `{ success, data?, error?, message? }`
//! - 400 for bad input, 401 for a missing session, 404 for unknown ids, 500 for
//!   everything the store or storage throws back
//!
//!
//!
//! # Notes
//!
//! ## Batches and snapshots
//! Creating a batch copies every active item's current stock into
//! `batch_inventory_snapshot` (999 for items without tracked stock). The copy
//! is never refreshed, later stock edits only affect future batches.
//!
//! ## Multi-statement writes
//! Item + inventory creation, batch + snapshot creation and menu reordering
//! each run inside one transaction. Reordering used to apply row by row and
//! could stop halfway, it is now all or nothing.
//!
//!
//!
//! # Setup
//!
//! Run locally.
//! ```sh
//! ADMIN_PASSWORD=changeme RUST_LOG=info cargo run -p backend
//! ```
//!
//! Environment.
//! ```sh
//! RUST_PORT=8787
//! DATABASE_URL=sqlite://admin.db
//! SESSION_TIMEOUT=86400
//! IMAGE_DIR=./images
//! IMAGE_PUBLIC_URL=/images
//! STATIC_DIR=./public
//! ALLOWED_ORIGIN=https://admin.example.com
//! CLOUDFLARE_API_BASE=https://api.cloudflare.com/client/v4
//! ```
//!
//! Secrets are read from `/run/secrets/<NAME>` first, then the environment.
//! ```sh
//! ADMIN_PASSWORD
//! CLOUDFLARE_API_TOKEN
//! CLOUDFLARE_ZONE_ID
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    middleware,
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod cdn;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod utils;

use auth::require_session;
use config::Config;
use routes::{batches, cache, inventory, menu, orders, schedules, session, upload};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/menu", get(menu::list_items).post(menu::create_item))
        .route("/menu/reorder", post(menu::reorder_items))
        .route(
            "/menu/{id}",
            get(menu::get_item)
                .put(menu::update_item)
                .delete(menu::delete_item),
        )
        .route("/inventory/{id}", put(inventory::update_inventory))
        .route(
            "/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route(
            "/schedules/{id}",
            put(schedules::update_schedule).delete(schedules::delete_schedule),
        )
        .route(
            "/batches",
            get(batches::list_batches).post(batches::create_batch),
        )
        .route(
            "/batches/{id}",
            get(batches::get_batch)
                .put(batches::update_batch)
                .delete(batches::delete_batch),
        )
        .route("/orders", get(orders::list_orders))
        .route("/cache/purge", post(cache::purge_cache))
        .route(
            "/upload-image",
            post(upload::upload_image).layer(DefaultBodyLimit::max(upload::UPLOAD_BODY_LIMIT)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .route("/auth", post(session::login))
        .route("/logout", post(session::logout));

    let mut app = Router::new()
        .nest("/api/admin", admin)
        .nest_service("/images", ServeDir::new(&state.config.image_dir))
        .fallback_service(ServeDir::new(&state.config.static_dir));

    if let Some(origin) = state.config.allowed_origin.clone() {
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(60 * 60));

        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;
    info!(cdn = state.cdn.is_configured(), "State ready");

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
