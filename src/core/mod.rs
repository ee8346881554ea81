//! Core types shared by every BWC module.
//!
//! At the moment this is the error taxonomy: [`BwcError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for turning any error into a
//! message with a copy-pasteable fix.

pub mod error;

pub use error::{BwcError, ErrorContext, user_friendly_error};
