use std::sync::Arc;

use crate::config::DashConfig;
use crate::db::pool::{open_pool, DbPool};
use crate::db::stocks;
use crate::error::DashError;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: DashConfig,
    pub pool: DbPool,
}

impl AppState {
    /// Open the database pool and make sure the schema exists.
    pub fn new(config: DashConfig) -> Result<Arc<Self>, DashError> {
        let pool = open_pool(&config.db_path, config.db_pool_size)?;
        let conn = pool.get()?;
        stocks::init_schema(&conn)?;
        drop(conn);

        Ok(Arc::new(Self { config, pool }))
    }
}
