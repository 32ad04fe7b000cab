//! Input mapping: raw keys and pointer motion to showcase actions.
//!
//! # Invariants
//! - Unbound input maps to `Action::Noop`, never an error.

pub mod action;

pub use action::{Action, Key, KeyAction, KeyBindings};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
