//! Transaction scopes.
//!
//! [`with_transaction`] is the atomic primitive everything else builds on: it
//! begins a transaction, hands the closure a [`TxScope`], commits when the
//! closure returns `Ok`, and rolls back when it returns `Err` or unwinds.
//! The closure's error is returned untouched.
//!
//! Scopes nest through [`TxScope::nested`], which uses SQLite savepoints. A
//! nested unit that fails rolls back its own savepoint and also marks the
//! enclosing transaction rollback-only, so the outermost unit can never
//! commit around a failed inner unit even if the failure was swallowed.

use std::cell::Cell;
use std::ops::Deref;

use actionforge_common::{Error, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::pool::{self, DbPool, PoolOptions, PooledConnection};

/// An open transactional scope.
///
/// Derefs to [`Connection`], so every query function accepts it directly.
pub struct TxScope<'c> {
    conn: &'c Connection,
    depth: usize,
    rollback_only: &'c Cell<bool>,
}

impl<'c> TxScope<'c> {
    /// Nesting depth: 0 for the outermost transaction.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a nested unit has failed, dooming the whole transaction.
    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only.get()
    }

    /// Run `f` as a nested unit inside this scope.
    ///
    /// On `Ok` the savepoint is released and its writes become part of the
    /// enclosing transaction. On `Err` the savepoint is rolled back, the
    /// enclosing transaction is marked rollback-only, and the error is
    /// returned unchanged.
    pub fn nested<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&TxScope<'_>) -> Result<T>,
    {
        let depth = self.depth + 1;
        let savepoint = Savepoint::begin(self.conn, depth)?;

        let inner = TxScope {
            conn: self.conn,
            depth,
            rollback_only: self.rollback_only,
        };

        match f(&inner) {
            Ok(_) if self.rollback_only.get() => {
                savepoint.rollback();
                Err(aborted())
            }
            Ok(value) => {
                savepoint.release()?;
                Ok(value)
            }
            Err(e) => {
                savepoint.rollback();
                self.rollback_only.set(true);
                Err(e)
            }
        }
    }
}

impl Deref for TxScope<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

impl std::fmt::Debug for TxScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxScope")
            .field("depth", &self.depth)
            .field("rollback_only", &self.rollback_only.get())
            .finish_non_exhaustive()
    }
}

/// Rolls back to its savepoint on drop unless released.
struct Savepoint<'c> {
    conn: &'c Connection,
    name: String,
    finished: bool,
}

impl<'c> Savepoint<'c> {
    fn begin(conn: &'c Connection, depth: usize) -> Result<Self> {
        let name = format!("actionforge_sp_{depth}");
        conn.execute_batch(&format!("SAVEPOINT {name}"))
            .map_err(|e| Error::database(format!("Failed to open savepoint {name}: {e}")))?;
        tracing::trace!(savepoint = %name, "Savepoint opened");
        Ok(Self {
            conn,
            name,
            finished: false,
        })
    }

    fn release(mut self) -> Result<()> {
        self.finished = true;
        self.conn
            .execute_batch(&format!("RELEASE {}", self.name))
            .map_err(|e| Error::database(format!("Failed to release savepoint {}: {e}", self.name)))
    }

    fn rollback(mut self) {
        self.finished = true;
        self.undo();
    }

    fn undo(&self) {
        let sql = format!("ROLLBACK TO {0}; RELEASE {0}", self.name);
        match self.conn.execute_batch(&sql) {
            Ok(()) => tracing::debug!(savepoint = %self.name, "Savepoint rolled back"),
            Err(e) => tracing::warn!(savepoint = %self.name, error = %e, "Savepoint rollback failed"),
        }
    }
}

impl Drop for Savepoint<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.undo();
        }
    }
}

fn aborted() -> Error {
    Error::TransactionAborted("a nested unit failed, so the transaction was rolled back".into())
}

fn rollback(tx: Transaction<'_>) {
    match tx.rollback() {
        Ok(()) => tracing::debug!("Transaction rolled back"),
        Err(e) => tracing::warn!(error = %e, "Transaction rollback failed"),
    }
}

/// Run `f` inside a transaction on `conn`.
///
/// The transaction is opened `IMMEDIATE` so that concurrent writers wait on
/// the busy timeout up front instead of failing on lock upgrade mid-way.
pub fn with_transaction<T, F>(conn: &Connection, f: F) -> Result<T>
where
    F: FnOnce(&TxScope<'_>) -> Result<T>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| Error::database(format!("Failed to begin transaction: {e}")))?;
    tracing::trace!("Transaction opened");

    let rollback_only = Cell::new(false);
    let result = f(&TxScope {
        conn: &tx,
        depth: 0,
        rollback_only: &rollback_only,
    });

    match result {
        Ok(_) if rollback_only.get() => {
            rollback(tx);
            Err(aborted())
        }
        Ok(value) => {
            tx.commit()
                .map_err(|e| Error::database(format!("Failed to commit transaction: {e}")))?;
            tracing::trace!("Transaction committed");
            Ok(value)
        }
        Err(e) => {
            rollback(tx);
            Err(e)
        }
    }
}

/// Handle to the persistence engine.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("max_size", &self.pool.max_size())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open (creating if needed) and migrate a database file.
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with(path, &PoolOptions::default())
    }

    /// Like [`Database::open`] with explicit pool settings.
    pub fn open_with(path: &str, options: &PoolOptions) -> Result<Self> {
        Ok(Self {
            pool: pool::init_pool(path, options)?,
        })
    }

    /// A fresh, migrated, private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            pool: pool::init_memory_pool()?,
        })
    }

    /// Check out a connection for work outside any transaction.
    pub fn conn(&self) -> Result<PooledConnection> {
        pool::get_conn(&self.pool)
    }

    /// Run `f` atomically on a pooled connection. See [`with_transaction`].
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&TxScope<'_>) -> Result<T>,
    {
        let conn = self.conn()?;
        with_transaction(&conn, f)
    }
}
