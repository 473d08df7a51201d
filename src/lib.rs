//! Actionforge - validated, atomically executed action objects
//!
//! This library crate exposes the concrete actions, configuration loading,
//! and notifications for the binary and for integration testing.

pub mod actions;
pub mod config;
pub mod notify;
