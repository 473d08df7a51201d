//! Actionforge-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across actionforge:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for users and posts
//! - **Validation**: Field-level rules and the ordered error set they produce
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use actionforge_common::{UserId, ValidationErrors, Error, Result};
//!
//! let user_id = UserId::new();
//!
//! let name: Option<String> = None;
//! let errors = ValidationErrors::check(|v| {
//!     v.presence("name", &name);
//! });
//! assert_eq!(errors.full_message(), "Name can't be blank");
//!
//! fn example(id: UserId) -> Result<()> {
//!     Err(Error::not_found("user", id))
//! }
//! assert!(example(user_id).is_err());
//! ```

pub mod error;
pub mod ids;
pub mod validation;

pub use error::{Error, Result};
pub use ids::*;
pub use validation::{Blank, ValidationErrors, Validator};
