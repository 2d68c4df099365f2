pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use config::Config;
use services::token::TokenCodec;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let tokens = TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl_hours)?;
        Ok(Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        })
    }
}
