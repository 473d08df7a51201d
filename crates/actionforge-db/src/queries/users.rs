//! User CRUD operations.
//!
//! Writes validate the record first, the same way the action layer does,
//! so a bad write fails with [`Error::RecordInvalid`] before touching the
//! table.

use actionforge_common::{Error, Result, UserId, ValidationErrors};
use chrono::Utc;
use rusqlite::Connection;

use super::write_error;
use crate::models::User;

const MODEL: &str = "User";

/// Create a new user.
///
/// # Returns
///
/// * `Ok(User)` - The created user
/// * `Err(Error::RecordInvalid)` - If the name is blank
/// * `Err(Error)` - If a database error occurs
pub fn create_user(conn: &Connection, name: &str) -> Result<User> {
    let errors = ValidationErrors::check(|v| {
        v.presence("name", name);
    });
    if !errors.is_empty() {
        return Err(Error::record_invalid(MODEL, errors));
    }

    let id = UserId::new();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO users (id, name, posts_count, created_at, updated_at)
         VALUES (:id, :name, 0, :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":name": name,
            ":created_at": now,
            ":updated_at": now,
        },
    )
    .map_err(|e| write_error(MODEL, e))?;

    Ok(User {
        id,
        name: name.to_string(),
        posts_count: 0,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a user by ID.
///
/// # Returns
///
/// * `Ok(Some(User))` - The user if found
/// * `Ok(None)` - If the user does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", User::COLUMNS),
        [id.to_string()],
        User::from_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by ID, failing with [`Error::NotFound`] if it does not exist.
pub fn find_user(conn: &Connection, id: UserId) -> Result<User> {
    get_user(conn, id)?.ok_or_else(|| Error::not_found("user", id))
}

/// List all users ordered by name.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM users ORDER BY name ASC",
            User::COLUMNS
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let users = stmt
        .query_map([], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(users)
}

/// Count all users.
pub fn count_users(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Set a user's posts counter.
///
/// # Returns
///
/// * `Ok(true)` - If the user was updated
/// * `Ok(false)` - If the user did not exist
/// * `Err(Error::RecordInvalid)` - If `posts_count` is negative
pub fn update_posts_count(conn: &Connection, id: UserId, posts_count: i64) -> Result<bool> {
    let errors = ValidationErrors::check(|v| {
        v.at_least("posts_count", posts_count, 0);
    });
    if !errors.is_empty() {
        return Err(Error::record_invalid(MODEL, errors));
    }

    let n = conn
        .execute(
            "UPDATE users SET posts_count = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![posts_count, Utc::now().to_rfc3339(), id.to_string()],
        )
        .map_err(|e| write_error(MODEL, e))?;

    Ok(n > 0)
}

/// Delete a user and, through the foreign key, their posts.
pub fn delete_user(conn: &Connection, id: UserId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM users WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(n > 0)
}
