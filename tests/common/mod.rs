//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which owns a fresh in-memory [`Database`] and a
//! [`Notifier`] that records every notification it is handed.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actionforge::notify::{Notification, Notifier};
use actionforge_db::{
    models::{Post, User},
    queries::{posts, users},
    Database,
};

/// Test harness wrapping an in-memory database and a recording notifier.
pub struct TestHarness {
    pub db: Database,
    pub notifier: Arc<Notifier>,
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("failed to open in-memory database");
        Self::with_db(db)
    }

    /// Wrap an existing database, e.g. a file-backed one.
    pub fn with_db(db: Database) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let notifier = Arc::new(Notifier::new(move |n| sink.lock().unwrap().push(n.clone())));
        Self { db, notifier, seen }
    }

    /// Insert a user directly, bypassing any action.
    pub fn create_user(&self, name: &str) -> User {
        let conn = self.db.conn().unwrap();
        users::create_user(&conn, name).unwrap()
    }

    pub fn reload_user(&self, user: &User) -> User {
        let conn = self.db.conn().unwrap();
        users::find_user(&conn, user.id).unwrap()
    }

    pub fn posts_for(&self, user: &User) -> Vec<Post> {
        let conn = self.db.conn().unwrap();
        posts::list_posts_for_user(&conn, user.id).unwrap()
    }

    pub fn post_count(&self) -> i64 {
        let conn = self.db.conn().unwrap();
        posts::count_posts(&conn).unwrap()
    }

    pub fn user_count(&self) -> i64 {
        let conn = self.db.conn().unwrap();
        users::count_users(&conn).unwrap()
    }

    /// Notifications delivered so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
