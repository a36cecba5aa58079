use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, anyhow};
use axum::http::HeaderValue;
use tracing::{info, warn};

use crate::cdn::CdnCredentials;

pub const DEFAULT_SESSION_TIMEOUT: u64 = 60 * 60 * 24;
pub const DEFAULT_CDN_API_BASE: &str = "https://api.cloudflare.com/client/v4";

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub admin_password: String,
    /// Max-Age of the session cookie, in seconds.
    pub session_timeout: u64,
    pub cdn_credentials: Option<CdnCredentials>,
    pub cdn_api_base: String,
    pub image_dir: PathBuf,
    pub image_public_url: String,
    pub static_dir: PathBuf,
    pub allowed_origin: Option<HeaderValue>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let admin_password = read_secret("ADMIN_PASSWORD")
            .filter(|password| !password.is_empty())
            .ok_or_else(|| anyhow!("ADMIN_PASSWORD must be provided"))?;

        let allowed_origin = env::var("ALLOWED_ORIGIN")
            .ok()
            .map(|origin| HeaderValue::from_str(&origin))
            .transpose()
            .context("Invalid ALLOWED_ORIGIN value")?;

        Ok(Self {
            port: try_load("RUST_PORT", "8787")?,
            database_url: try_load("DATABASE_URL", "sqlite://admin.db")?,
            admin_password,
            session_timeout: try_load("SESSION_TIMEOUT", &DEFAULT_SESSION_TIMEOUT.to_string())?,
            cdn_credentials: load_cdn_credentials(),
            cdn_api_base: try_load("CLOUDFLARE_API_BASE", DEFAULT_CDN_API_BASE)?,
            image_dir: try_load("IMAGE_DIR", "./images")?,
            image_public_url: try_load("IMAGE_PUBLIC_URL", "/images")?,
            static_dir: try_load("STATIC_DIR", "./public")?,
            allowed_origin,
        })
    }
}

fn load_cdn_credentials() -> Option<CdnCredentials> {
    match (
        read_secret("CLOUDFLARE_API_TOKEN"),
        read_secret("CLOUDFLARE_ZONE_ID"),
    ) {
        (Some(api_token), Some(zone_id)) => Some(CdnCredentials { api_token, zone_id }),
        (None, None) => {
            info!("CDN credentials not set, cache purges stay local");
            None
        }
        _ => {
            warn!("Only one of CLOUDFLARE_API_TOKEN/CLOUDFLARE_ZONE_ID is set, ignoring both");
            None
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

/// Docker secret first, then the plain environment variable.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Some(secret.trim().to_string()),
        Err(_) => env::var(secret_name).ok().map(|s| s.trim().to_string()),
    }
}
