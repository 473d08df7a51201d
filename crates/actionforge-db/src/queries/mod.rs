//! Database query modules.
//!
//! This module organizes all database operations into logical groups:
//! - users: User CRUD and the denormalized posts counter
//! - posts: Post creation and lookup

pub mod posts;
pub mod users;

use actionforge_common::{Error, ValidationErrors};

/// Map a failed write to an error, turning table constraint failures into
/// [`Error::RecordInvalid`] for `model`.
pub(crate) fn write_error(model: &str, e: rusqlite::Error) -> Error {
    let message = e.to_string();

    if let Some(column) = message
        .strip_prefix("NOT NULL constraint failed: ")
        .and_then(|rest| rest.rsplit('.').next())
    {
        let mut errors = ValidationErrors::new();
        errors.add(column.trim(), "can't be blank");
        return Error::record_invalid(model, errors);
    }

    if message.contains("FOREIGN KEY constraint failed") {
        let mut errors = ValidationErrors::new();
        errors.add_base("Referenced record must exist");
        return Error::record_invalid(model, errors);
    }

    if message.contains("UNIQUE constraint failed") {
        return Error::Conflict(format!("{model} already exists"));
    }

    Error::database(message)
}
