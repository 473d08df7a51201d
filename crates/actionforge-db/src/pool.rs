//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use std::time::Duration;

use actionforge_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Tunables applied when building a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum number of pooled connections.
    pub max_size: u32,
    /// How long a connection waits on a locked database before giving up.
    pub busy_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_size: 4,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Enable foreign key constraints, WAL journaling, and the busy timeout
///   on all connections
/// - Run pending database migrations
///
/// # Example
///
/// ```no_run
/// use actionforge_db::pool::{init_pool, PoolOptions};
///
/// let pool = init_pool("/var/lib/actionforge/db.sqlite", &PoolOptions::default()).unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str, options: &PoolOptions) -> Result<DbPool> {
    let busy_timeout = options.busy_timeout;
    let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )?;
        conn.busy_timeout(busy_timeout)
    });

    let pool = Pool::builder()
        .max_size(options.max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    migrate(&pool)?;

    tracing::debug!(path = db_path, max_size = options.max_size, "Database pool ready");

    Ok(pool)
}

/// Initialize an in-memory database pool for testing.
///
/// Each call creates a uniquely-named shared-cache in-memory database so
/// that parallel tests do not interfere with each other, while all
/// connections within a single pool still share state. The database is
/// lost when the pool is dropped.
///
/// # Example
///
/// ```
/// use actionforge_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:actionforge_mem_{n}?mode=memory&cache=shared");

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = Pool::builder()
        .max_size(PoolOptions::default().max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {e}")))?;

    migrate(&pool)?;

    Ok(pool)
}

fn migrate(pool: &DbPool) -> Result<()> {
    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {e}")))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {e}")))?;

    Ok(())
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
