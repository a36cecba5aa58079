use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;

use super::{
    auth::{CookieMarker, SessionValidator},
    cdn::CdnClient,
    config::Config,
    database::init_database,
    storage::{ImageStore, LocalImageStore},
};

pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub images: Arc<dyn ImageStore>,
    pub cdn: CdnClient,
    pub sessions: Box<dyn SessionValidator>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let pool = init_database(&config.database_url).await?;
        let images = Arc::new(LocalImageStore::new(&config.image_dir));

        Ok(Self::from_parts(config, pool, images))
    }

    pub fn from_parts(config: Config, pool: SqlitePool, images: Arc<dyn ImageStore>) -> Arc<Self> {
        let cdn = CdnClient::new(&config.cdn_api_base, config.cdn_credentials.clone());

        Arc::new(Self {
            config,
            pool,
            images,
            cdn,
            sessions: Box::new(CookieMarker),
        })
    }
}
