//! Database connection management.

use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect the process-wide pool. Call once at startup, before any request
/// is served.
pub async fn init_db(database_url: String) {
    let pool = Database::connect(&database_url)
        .await
        .expect("Failed to connect to the database.");

    if DB_POOL.set(pool).is_err() {
        panic!("init_db called more than once");
    }
}

/// Returns the process-wide database pool.
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("Database pool accessed before init_db")
}
