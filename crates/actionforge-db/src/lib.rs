//! Actionforge-DB: Database schema, migrations, queries, and transactions
//!
//! This crate provides the persistence engine actions run against, using
//! SQLite with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `transaction` - Transaction scopes and the [`Database`] handle
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use actionforge_db::Database;
//! use actionforge_db::queries::users;
//!
//! let db = Database::open("/var/lib/actionforge/db.sqlite").unwrap();
//!
//! let user = db
//!     .with_transaction(|tx| users::create_user(tx, "admin"))
//!     .unwrap();
//! println!("Created user: {}", user.name);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod transaction;

pub use pool::{DbPool, PoolOptions, PooledConnection};
pub use transaction::{with_transaction, Database, TxScope};
