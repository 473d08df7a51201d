//! Post operations.

use actionforge_common::{Error, PostId, Result, UserId, ValidationErrors};
use chrono::Utc;
use rusqlite::Connection;

use super::{users, write_error};
use crate::models::Post;

const MODEL: &str = "Post";

/// Create a post belonging to `user_id`.
///
/// A missing or blank title, or an owner that does not exist, fails with
/// [`Error::RecordInvalid`] and writes nothing.
pub fn create_post(conn: &Connection, user_id: UserId, title: Option<&str>) -> Result<Post> {
    let owner_exists = users::get_user(conn, user_id)?.is_some();
    let errors = ValidationErrors::check(|v| {
        v.custom("user", owner_exists, "must exist")
            .presence("title", &title);
    });
    if !errors.is_empty() {
        return Err(Error::record_invalid(MODEL, errors));
    }

    let id = PostId::new();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO posts (id, user_id, title, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        rusqlite::params![id.to_string(), user_id.to_string(), title, now],
    )
    .map_err(|e| write_error(MODEL, e))?;

    Ok(Post {
        id,
        user_id,
        title: title.unwrap_or_default().to_string(),
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a post by ID.
pub fn get_post(conn: &Connection, id: PostId) -> Result<Option<Post>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM posts WHERE id = ?1", Post::COLUMNS),
        [id.to_string()],
        Post::from_row,
    );

    match result {
        Ok(post) => Ok(Some(post)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List a user's posts, oldest first.
pub fn list_posts_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<Post>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM posts WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC",
            Post::COLUMNS
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let posts = stmt
        .query_map([user_id.to_string()], Post::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(posts)
}

/// Count all posts.
pub fn count_posts(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}
