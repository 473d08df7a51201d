//! [`Command`] drives a single [`Action`] through its lifecycle.
//!
//! ```text
//! Unvalidated --rules fail-----> Invalid    try_save -> Ok(false)
//! Unvalidated --rules pass-----> Valid
//! Valid       --execute err----> Failed     rolled back, error returned
//! Valid       --execute ok-----> Committed
//! Committed   --after_execute--> Done       try_save -> Ok(true)
//! ```
//!
//! Validation failures and execution failures are reported differently:
//! [`Command::try_save`] answers `Ok(false)` when the rules reject the
//! attributes, but returns `Err` when execution fails. [`Command::save`]
//! turns the `Ok(false)` case into [`Error::Validation`] and passes
//! execution errors through untouched.

use std::ops::Deref;

use actionforge_common::{Error, Result, ValidationErrors, Validator};
use actionforge_db::{Database, TxScope};
use serde::de::DeserializeOwned;

use crate::action::Action;

/// Where a [`Command`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed; rules not yet checked.
    Unvalidated,
    /// The last validation passed.
    Valid,
    /// The last validation failed.
    Invalid,
    /// `execute` returned an error and its transaction was rolled back.
    Failed,
    /// `execute` succeeded and its transaction committed.
    Committed,
    /// The post-commit hook has run.
    Done,
}

impl State {
    /// Whether execution has been attempted. A command in one of these
    /// states cannot be saved again.
    pub fn has_executed(self) -> bool {
        matches!(self, State::Failed | State::Committed | State::Done)
    }
}

/// A single-use invocation of an action.
#[derive(Debug)]
pub struct Command<A> {
    action: A,
    errors: ValidationErrors,
    state: State,
}

impl<A: Action> Command<A> {
    /// Wrap `action` without validating it.
    pub fn new(action: A) -> Self {
        Self {
            action,
            errors: ValidationErrors::new(),
            state: State::Unvalidated,
        }
    }

    /// Build the action from a map of named attributes.
    ///
    /// Attribute names the action does not declare are rejected when the
    /// action's `Deserialize` impl uses `deny_unknown_fields`.
    pub fn from_attributes(attributes: serde_json::Value) -> Result<Self>
    where
        A: DeserializeOwned,
    {
        let action = serde_json::from_value(attributes)
            .map_err(|e| Error::invalid_input(format!("Invalid attributes: {e}")))?;
        Ok(Self::new(action))
    }

    /// Check the action's rules against its current attributes.
    ///
    /// The error set is rebuilt from scratch on every call.
    pub fn is_valid(&mut self) -> bool {
        self.errors.clear();
        self.action.validate(&mut Validator::new(&mut self.errors));

        let valid = self.errors.is_empty();
        if !self.state.has_executed() {
            self.state = if valid { State::Valid } else { State::Invalid };
        }
        valid
    }

    /// Errors from the most recent validation.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    /// Mutable access to the action's attributes, e.g. to correct them
    /// after a failed validation.
    pub fn action_mut(&mut self) -> &mut A {
        &mut self.action
    }

    pub fn into_inner(self) -> A {
        self.action
    }

    /// Validate, then execute atomically in a new transaction on `db`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Executed, committed, and the post-commit hook ran
    /// * `Ok(false)` - Validation failed; nothing ran and no transaction was opened
    /// * `Err(Error::AlreadyExecuted)` - This command has already executed
    /// * `Err(e)` - `execute` (or the hook) failed; `e` is returned as raised
    pub fn try_save(&mut self, db: &Database) -> Result<bool> {
        let span = tracing::debug_span!("action", name = self.action.name());
        let _enter = span.enter();

        if !self.prepare()? {
            return Ok(false);
        }

        let action = &mut self.action;
        let result = db.with_transaction(|tx| action.execute(tx));
        self.finish(result)
    }

    /// Like [`try_save`](Self::try_save), but fails with
    /// [`Error::Validation`] when the rules reject the attributes.
    pub fn save(&mut self, db: &Database) -> Result<()> {
        if self.try_save(db)? {
            Ok(())
        } else {
            Err(Error::Validation(self.errors.clone()))
        }
    }

    /// Validate, then execute as a nested unit of an enclosing transaction.
    ///
    /// Used when one action invokes another from its own `execute`. The
    /// nested unit is rolled back on failure and the enclosing transaction
    /// is marked rollback-only, so the outer action cannot commit without
    /// it. This action's `after_execute` runs as soon as its nested unit
    /// has been released.
    pub fn try_save_within(&mut self, tx: &TxScope<'_>) -> Result<bool> {
        let span = tracing::debug_span!("action", name = self.action.name(), depth = tx.depth() + 1);
        let _enter = span.enter();

        if !self.prepare()? {
            return Ok(false);
        }

        let action = &mut self.action;
        let result = tx.nested(|inner| action.execute(inner));
        self.finish(result)
    }

    /// Like [`try_save_within`](Self::try_save_within), but fails with
    /// [`Error::Validation`] when the rules reject the attributes.
    pub fn save_within(&mut self, tx: &TxScope<'_>) -> Result<()> {
        if self.try_save_within(tx)? {
            Ok(())
        } else {
            Err(Error::Validation(self.errors.clone()))
        }
    }

    fn prepare(&mut self) -> Result<bool> {
        if self.state.has_executed() {
            return Err(Error::AlreadyExecuted {
                action: self.action.name().to_string(),
            });
        }

        if !self.is_valid() {
            tracing::debug!(errors = %self.errors, "Validation failed");
            return Ok(false);
        }

        Ok(true)
    }

    fn finish(&mut self, result: Result<()>) -> Result<bool> {
        if let Err(e) = result {
            self.state = State::Failed;
            tracing::warn!(error = %e, "Execution failed, changes rolled back");
            return Err(e);
        }

        self.state = State::Committed;
        self.action.after_execute()?;
        self.state = State::Done;

        tracing::debug!("Completed");
        Ok(true)
    }
}

impl<A> Deref for Command<A> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.action
    }
}
