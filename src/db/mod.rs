use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

pub mod store;

use crate::error::EventsError;
pub use store::SqlEventStore;

/// Open the SQLite connection pool and run migrations.
///
/// In-memory databases live per connection, so they get a single connection
/// that is never recycled.
pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool, EventsError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            EventsError::ConfigError(format!("Invalid database URL '{}': {}", database_url, e))
        })?
        .create_if_missing(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    info!("Connecting to database at {}", database_url);
    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| EventsError::DatabaseError(format!("Failed to connect to database: {}", e)))?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| EventsError::DatabaseError(format!("Failed to run migrations: {}", e)))?;

    info!("Database initialized successfully");
    Ok(pool)
}
