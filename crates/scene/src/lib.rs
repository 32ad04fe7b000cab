//! Scene service: nodes, materials, camera, ray queries and labels.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - Node iteration and ray-hit tie breaks follow insertion order.
//! - Materials are shared by `Arc`, so swapping one back restores the same object.

mod camera;
mod graph;
mod label;
mod material;
mod ray;
mod renderer;

pub use camera::OrbitCamera;
pub use graph::{Geometry, Node, NodeId, SceneGraph};
pub use label::{Label, ProjectedLabel, Viewport, project_label};
pub use material::{
    Color, ImageTexture, Material, OutlineParams, Refreshable, Texture, TextureId, TextureStore,
    VideoTexture,
};
pub use ray::{Hit, Ray, intersect_box};
pub use renderer::{DebugTextRenderer, OverlayRenderer, Renderer};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
