//! Shared types used across the folio crates.

mod types;

pub use types::{EntityId, Transform};
