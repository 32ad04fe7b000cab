use crate::camera::OrbitCamera;
use crate::graph::SceneGraph;
use crate::label::{ProjectedLabel, Viewport};
use crate::material::{Refreshable, Texture};

/// Renderer-agnostic 3D pass. All renderers implement this trait.
///
/// The renderer reads the scene and the camera, then produces output. It
/// never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the 3D scene.
    fn render(&mut self, scene: &SceneGraph, camera: &OrbitCamera) -> Self::Output;
}

/// 2D pass drawn on top of the 3D frame.
pub trait OverlayRenderer {
    type Output;

    fn render_labels(&mut self, labels: &[ProjectedLabel], viewport: Viewport) -> Self::Output;
}

/// Produces a human-readable description of a frame.
///
/// Used by the headless CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &SceneGraph, camera: &OrbitCamera) -> String {
        let mut out = String::new();
        let eye = camera.position();
        out.push_str(&format!("=== Scene ({} nodes) ===\n", scene.len()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            eye.x,
            eye.y,
            eye.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov.to_degrees()
        ));

        for (id, node) in scene.nodes() {
            let p = node.transform.position;
            let video_frame = match node.material.map().and_then(|t| scene.textures().get(t)) {
                Some(Texture::Video(v)) => format!(" frame={}", v.generation()),
                _ => String::new(),
            };
            out.push_str(&format!(
                "  [{}] {:<12} pos=({:.2}, {:.2}, {:.2}) material={}{}{}\n",
                id.0,
                node.name,
                p.x,
                p.y,
                p.z,
                node.material.kind(),
                video_frame,
                if node.visible { "" } else { " (hidden)" }
            ));
        }

        out
    }
}

impl OverlayRenderer for DebugTextRenderer {
    type Output = String;

    fn render_labels(&mut self, labels: &[ProjectedLabel], viewport: Viewport) -> String {
        let mut out = format!(
            "=== Labels ({} visible, {}x{}) ===\n",
            labels.len(),
            viewport.width,
            viewport.height
        );
        for label in labels {
            out.push_str(&format!(
                "  ({:.0}, {:.0}) {}: {}\n",
                label.screen.x, label.screen.y, label.title, label.body
            ));
        }
        out
    }
}
