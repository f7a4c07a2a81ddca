/// Shared application state
use sqlx::SqlitePool;

/// Application state shared across all handlers
///
/// Holds only the database pool; requests share no other state.
#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
