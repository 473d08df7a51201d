//! The [`Action`] trait defines a single unit of business logic.
//!
//! Each action declares the rules its attributes must satisfy, the work it
//! performs inside a transaction, and optionally work to do once that
//! transaction has committed. Actions are driven by a
//! [`Command`](crate::Command); they are never run directly.

use actionforge_common::{Error, Result, Validator};
use actionforge_db::TxScope;

/// A validated, atomically executed unit of work.
///
/// Implementors hold their input attributes as ordinary fields and override
/// [`execute`](Action::execute). Everything else has a default.
pub trait Action {
    /// A short, human-readable name for this action (e.g. "CreatePost").
    ///
    /// Defaults to the unqualified type name.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Declare the validation rules for this action's attributes.
    ///
    /// Called on every validation request against a fresh error set. The
    /// default declares no rules.
    fn validate(&self, _v: &mut Validator<'_>) {}

    /// Perform the action inside the transaction `tx`.
    ///
    /// Return an error to signal failure; every write made through `tx`
    /// is then rolled back and the error reaches the caller unchanged.
    /// The default fails with [`Error::NotImplemented`].
    fn execute(&mut self, _tx: &TxScope<'_>) -> Result<()> {
        Err(Error::not_implemented(format!(
            "{} must implement execute",
            self.name()
        )))
    }

    /// Run after `execute` succeeded and its transaction committed.
    ///
    /// Effects here are outside the atomic unit and are not rolled back.
    /// The default implementation is a no-op.
    fn after_execute(&mut self) -> Result<()> {
        Ok(())
    }
}
