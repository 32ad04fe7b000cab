use crate::camera::OrbitCamera;
use glam::{Vec2, Vec3};

/// Text annotation anchored at a point in world space. Hidden until shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub title: String,
    pub body: String,
    anchor: Vec3,
    visible: bool,
}

impl Label {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            anchor: Vec3::ZERO,
            visible: false,
        }
    }

    pub fn show_at(&mut self, anchor: Vec3) {
        self.anchor = anchor;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// NDC (y up) to pixels (origin top-left, y down).
    pub fn ndc_to_pixels(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// A visible label resolved to screen space for the overlay pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLabel {
    pub title: String,
    pub body: String,
    /// Pixel position of the anchor.
    pub screen: Vec2,
}

/// Resolve a label to screen space. Hidden labels and anchors behind the
/// camera produce `None`.
pub fn project_label(
    label: &Label,
    camera: &OrbitCamera,
    viewport: Viewport,
) -> Option<ProjectedLabel> {
    if !label.is_visible() {
        return None;
    }
    let ndc = camera.project(label.anchor())?;
    Some(ProjectedLabel {
        title: label.title.clone(),
        body: label.body.clone(),
        screen: viewport.ndc_to_pixels(ndc.truncate()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_start_hidden() {
        let l = Label::new("Me", "I like to build cool stuff.");
        assert!(!l.is_visible());
        assert!(project_label(&l, &OrbitCamera::default(), Viewport::default()).is_none());
    }

    #[test]
    fn show_and_hide() {
        let mut l = Label::new("t", "b");
        l.show_at(Vec3::new(0.0, 9.0, 4.0));
        assert!(l.is_visible());
        assert_eq!(l.anchor(), Vec3::new(0.0, 9.0, 4.0));
        l.hide();
        l.hide();
        assert!(!l.is_visible());
    }

    #[test]
    fn camera_target_lands_mid_screen() {
        let mut l = Label::new("t", "b");
        l.show_at(Vec3::ZERO);
        let viewport = Viewport::new(800, 600);
        let p = project_label(&l, &OrbitCamera::default(), viewport).unwrap();
        assert!(p.screen.abs_diff_eq(Vec2::new(400.0, 300.0), 0.05));
        assert_eq!(p.title, "t");
    }

    #[test]
    fn ndc_corners_map_to_pixel_corners() {
        let v = Viewport::new(200, 100);
        assert_eq!(v.ndc_to_pixels(Vec2::new(-1.0, 1.0)), Vec2::ZERO);
        assert_eq!(v.ndc_to_pixels(Vec2::new(1.0, -1.0)), Vec2::new(200.0, 100.0));
    }
}
