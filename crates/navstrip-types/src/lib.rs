//! Foundation types for navstrip.
//!
//! Platform-agnostic types shared by every navstrip crate: colors, touch
//! events, action specs, the user settings model, and error types.

pub mod action;
pub mod color;
pub mod error;
pub mod input;
pub mod settings;
