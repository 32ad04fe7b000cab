//! Showcase kernel: exhibits, hover interaction, reset and the frame loop.
//!
//! # Invariants
//! - At most one exhibit is highlighted after any hover pass.
//! - A single physics step never exceeds the configured `max_step`.
//! - The frame loop never fails; bad surfaces and stale handles are logged.

pub mod config;
pub mod exhibit;
pub mod interaction;
pub mod registry;
pub mod reset;
pub mod showcase;
pub mod simulation;

pub use config::{
    CameraConfig, ConfigError, ControlsConfig, ExhibitConfig, FloorConfig, LabelConfig,
    LabelOffsets, PhysicsConfig, ShowcaseConfig, SurfaceSpec,
};
pub use exhibit::{EXHIBIT_EDGE, EXHIBIT_MASS, Exhibit, SurfaceSource};
pub use interaction::InteractionState;
pub use registry::SceneRegistry;
pub use reset::ResetController;
pub use showcase::{Floor, Showcase};
pub use simulation::{FrameClock, FrameOutput, FrameReport, LoopState, SimulationLoop, clamp_step};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
