use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{
    auth::token::TokenKeys,
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
};

/// Shared handles injected into every handler through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub tokens: Arc<TokenKeys>,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        Self {
            orm: orm_from_pool(pool.clone()),
            pool,
            tokens: Arc::new(TokenKeys::new(&config.jwt_secret, config.token_ttl)),
            store_timeout: config.store_timeout,
        }
    }
}

impl FromRef<AppState> for Arc<TokenKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
