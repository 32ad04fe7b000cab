use crate::config::LabelOffsets;
use crate::registry::SceneRegistry;
use folio_scene::{OrbitCamera, Ray, SceneGraph};

/// Hover tracking: which exhibit, if any, sits under the screen centre.
#[derive(Debug, Default, Clone)]
pub struct InteractionState {
    hovered: Option<usize>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry index of the exhibit highlighted by the last pass.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Run one hover pass along the camera's screen-centre ray.
    pub fn hover_pass(
        &mut self,
        registry: &mut SceneRegistry,
        scene: &mut SceneGraph,
        camera: &OrbitCamera,
        offsets: LabelOffsets,
    ) -> Option<usize> {
        self.hover_along(&camera.screen_center_ray(), registry, scene, offsets)
    }

    /// Clear every highlight, then highlight the nearest exhibit hit by `ray`.
    ///
    /// At most one exhibit is highlighted afterwards.
    pub fn hover_along(
        &mut self,
        ray: &Ray,
        registry: &mut SceneRegistry,
        scene: &mut SceneGraph,
        offsets: LabelOffsets,
    ) -> Option<usize> {
        for exhibit in registry.iter_mut() {
            exhibit.clear_highlight(scene);
        }

        let nearest = scene
            .raycast(ray, registry.nodes())
            .first()
            .and_then(|hit| registry.index_of_node(hit.node));

        if let Some(exhibit) = nearest.and_then(|i| registry.get_mut(i)) {
            exhibit.highlight(scene, offsets);
        }

        if nearest != self.hovered {
            match nearest.and_then(|i| registry.get(i)) {
                Some(e) => tracing::debug!(exhibit = e.name(), "hover"),
                None => tracing::debug!("hover cleared"),
            }
        }
        self.hovered = nearest;
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibit::{Exhibit, SurfaceSource};
    use folio_physics::RapierWorld;
    use folio_scene::Label;
    use glam::Vec3;
    use std::sync::Arc;

    fn scene_with(positions: &[(&str, Vec3)]) -> (SceneRegistry, SceneGraph) {
        let mut physics = RapierWorld::default();
        let mut scene = SceneGraph::new();
        let mut registry = SceneRegistry::new();
        for (name, pos) in positions {
            let e = Exhibit::create(&mut physics, &mut scene, *name, *pos, SurfaceSource::Default)
                .with_top_label(Label::new(*name, "top"))
                .with_bottom_label(Label::new(*name, "bottom"));
            registry.register(e);
        }
        (registry, scene)
    }

    #[test]
    fn single_object_under_center_is_highlighted() {
        let (mut registry, mut scene) =
            scene_with(&[("nerf", Vec3::ZERO), ("plant", Vec3::new(30.0, 0.0, 0.0))]);
        let camera = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
        let mut state = InteractionState::new();

        let hovered = state.hover_pass(&mut registry, &mut scene, &camera, LabelOffsets::default());
        assert_eq!(hovered, Some(0));
        assert_eq!(registry.highlighted_count(), 1);

        let nerf = registry.get(0).unwrap();
        assert!(nerf.is_highlighted());
        assert_eq!(scene.get(nerf.node()).unwrap().material.kind(), "outline");
        assert_eq!(nerf.top_label().unwrap().anchor(), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(nerf.bottom_label().unwrap().anchor(), Vec3::new(0.0, -5.0, 0.0));
        assert!(nerf.labels().all(|l| l.is_visible()));

        let plant = registry.get(1).unwrap();
        assert!(!plant.is_highlighted());
        assert!(Arc::ptr_eq(&scene.get(plant.node()).unwrap().material, plant.default_material()));
        assert!(plant.labels().all(|l| !l.is_visible()));
    }

    #[test]
    fn nearest_of_overlapping_hits_wins() {
        let (mut registry, mut scene) = scene_with(&[
            ("far", Vec3::new(0.0, 0.0, -10.0)),
            ("near", Vec3::ZERO),
        ]);
        let camera = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
        let mut state = InteractionState::new();
        let hovered = state.hover_pass(&mut registry, &mut scene, &camera, LabelOffsets::default());
        assert_eq!(hovered, Some(1));
        assert_eq!(registry.highlighted_count(), 1);
    }

    #[test]
    fn moving_away_clears_highlight() {
        let (mut registry, mut scene) = scene_with(&[("me", Vec3::ZERO)]);
        let mut state = InteractionState::new();
        let offsets = LabelOffsets::default();

        let toward = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        assert_eq!(state.hover_along(&toward, &mut registry, &mut scene, offsets), Some(0));

        let away = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::Z);
        assert_eq!(state.hover_along(&away, &mut registry, &mut scene, offsets), None);
        assert_eq!(state.hovered(), None);
        assert_eq!(registry.highlighted_count(), 0);
        let me = registry.get(0).unwrap();
        assert!(Arc::ptr_eq(&scene.get(me.node()).unwrap().material, me.default_material()));
    }

    #[test]
    fn at_most_one_highlight_across_many_passes() {
        let (mut registry, mut scene) = scene_with(&[
            ("a", Vec3::new(-6.0, 0.0, 0.0)),
            ("b", Vec3::ZERO),
            ("c", Vec3::new(6.0, 0.0, 0.0)),
        ]);
        let mut state = InteractionState::new();
        for x in -10..=10 {
            let ray = Ray::new(Vec3::new(x as f32, 0.5, 30.0), Vec3::NEG_Z);
            state.hover_along(&ray, &mut registry, &mut scene, LabelOffsets::default());
            assert!(registry.highlighted_count() <= 1);
        }
    }

    #[test]
    fn empty_registry_hovers_nothing() {
        let mut registry = SceneRegistry::new();
        let mut scene = SceneGraph::new();
        let mut state = InteractionState::new();
        let camera = OrbitCamera::default();
        let hovered = state.hover_pass(&mut registry, &mut scene, &camera, LabelOffsets::default());
        assert_eq!(hovered, None);
    }
}
