//! # actionforge-action
//!
//! Action objects: units of business logic that are validated first and then
//! executed as a single atomic operation.
//!
//! This crate provides:
//!
//! - **[`Action`]** trait -- declares validation rules, the work to run inside
//!   a transaction, and an optional post-commit hook.
//! - **[`Command`]** -- drives one action through its lifecycle: validate,
//!   open a transaction, execute, commit or roll back, then run the hook.
//! - **[`State`]** -- where a command is in that lifecycle.
//!
//! ```
//! use actionforge_action::{Action, Command};
//! use actionforge_common::{Result, Validator};
//! use actionforge_db::{queries::users, Database, TxScope};
//!
//! struct CreateUser {
//!     name: String,
//! }
//!
//! impl Action for CreateUser {
//!     fn validate(&self, v: &mut Validator<'_>) {
//!         v.presence("name", &self.name);
//!     }
//!
//!     fn execute(&mut self, tx: &TxScope<'_>) -> Result<()> {
//!         users::create_user(tx, &self.name)?;
//!         Ok(())
//!     }
//! }
//!
//! let db = Database::open_in_memory().unwrap();
//!
//! let mut blank = Command::new(CreateUser { name: String::new() });
//! assert!(!blank.try_save(&db).unwrap());
//! assert_eq!(blank.errors().full_message(), "Name can't be blank");
//!
//! let mut ok = Command::new(CreateUser { name: "foo".into() });
//! ok.save(&db).unwrap();
//! ```

pub mod action;
pub mod command;

pub use action::Action;
pub use command::{Command, State};
