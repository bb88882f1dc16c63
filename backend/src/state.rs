use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::PgCredentialStore,
    services::token::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wires the token service to the Postgres credential store.
    pub fn new(pool: DbPool, config: Config) -> Self {
        let store = Arc::new(PgCredentialStore::new(pool.clone()));
        let tokens = Arc::new(TokenService::from_config(&config, store));
        Self {
            pool,
            config,
            tokens,
        }
    }
}
