//! Physics service: rigid bodies stepped by an external solver.
//!
//! # Invariants
//! - Bodies are owned by the world; callers only hold `BodyHandle`s.
//! - One collider per body.

mod backend;
mod rapier;

pub use backend::{BodyDesc, BodyHandle, BodyKind, BodyState, PhysicsBackend, PhysicsError, Shape};
pub use rapier::RapierWorld;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
