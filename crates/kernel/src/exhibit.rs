use crate::config::LabelOffsets;
use folio_common::{EntityId, Transform};
use folio_physics::{BodyDesc, BodyHandle, PhysicsBackend, PhysicsError};
use folio_scene::{
    Color, Geometry, Label, Material, Node, NodeId, OutlineParams, SceneGraph, TextureId,
};
use glam::{Quat, Vec3};
use rand::Rng;
use std::sync::Arc;

/// Edge length of every exhibit cube.
pub const EXHIBIT_EDGE: f32 = 4.0;
pub const EXHIBIT_MASS: f32 = 1.0;

/// Where an exhibit's surface comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceSource {
    /// Normal-shaded, no texture.
    Default,
    StaticImage(TextureId),
    VideoStream(TextureId),
    /// A source kind the showcase cannot display; the string names it.
    Unrecognized(String),
}

/// A physics-driven box bound to a scene node, with optional labels.
#[derive(Debug)]
pub struct Exhibit {
    id: EntityId,
    name: String,
    home: Vec3,
    body: BodyHandle,
    node: NodeId,
    default_material: Arc<Material>,
    outline_material: Arc<Material>,
    highlighted: bool,
    top_label: Option<Label>,
    bottom_label: Option<Label>,
}

impl Exhibit {
    /// Create the body and the node at `spawn` and remember `spawn` as home.
    ///
    /// A surface that cannot be resolved is logged and replaced with a flat
    /// red material; creation itself never fails.
    pub fn create<P: PhysicsBackend + ?Sized>(
        physics: &mut P,
        scene: &mut SceneGraph,
        name: impl Into<String>,
        spawn: Vec3,
        source: SurfaceSource,
    ) -> Self {
        let name = name.into();
        let default_material = Arc::new(surface_material(scene, &name, &source));
        let outline_material = Arc::new(Material::Outline(OutlineParams::around(
            default_material.map(),
        )));

        let half = Vec3::splat(EXHIBIT_EDGE / 2.0);
        let body = physics.create_body(&BodyDesc::dynamic_cuboid(half, EXHIBIT_MASS, spawn));
        let node = scene.insert(Node::new(
            name.clone(),
            Geometry::cube(EXHIBIT_EDGE),
            default_material.clone(),
            Transform::from_position(spawn),
        ));

        let id = EntityId::new();
        tracing::debug!(%id, %name, %body, material = default_material.kind(), "created exhibit");

        Self {
            id,
            name,
            home: spawn,
            body,
            node,
            default_material,
            outline_material,
            highlighted: false,
            top_label: None,
            bottom_label: None,
        }
    }

    pub fn with_top_label(mut self, label: Label) -> Self {
        self.top_label = Some(label);
        self
    }

    pub fn with_bottom_label(mut self, label: Label) -> Self {
        self.bottom_label = Some(label);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn default_material(&self) -> &Arc<Material> {
        &self.default_material
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn top_label(&self) -> Option<&Label> {
        self.top_label.as_ref()
    }

    pub fn bottom_label(&self) -> Option<&Label> {
        self.bottom_label.as_ref()
    }

    /// Both labels, top first.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.top_label.iter().chain(self.bottom_label.iter())
    }

    /// Overwrite the spin without touching anything else.
    pub fn set_spin<P: PhysicsBackend + ?Sized>(
        &self,
        physics: &mut P,
        spin: Vec3,
    ) -> Result<(), PhysicsError> {
        physics.set_angular_velocity(self.body, spin)
    }

    /// Copy the body's pose onto the node. Node scale is left alone.
    pub fn sync_from_physics<P>(&self, physics: &P, scene: &mut SceneGraph)
    where
        P: PhysicsBackend + ?Sized,
    {
        let state = match physics.body_state(self.body) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(id = %self.id, exhibit = %self.name, "skipping sync: {e}");
                return;
            }
        };
        if let Some(node) = scene.get_mut(self.node) {
            node.transform.position = state.position;
            node.transform.rotation = state.rotation;
        }
    }

    /// Swap in the outline material and show the labels around the node's
    /// current position.
    pub fn highlight(&mut self, scene: &mut SceneGraph, offsets: LabelOffsets) {
        scene.set_material(self.node, self.outline_material.clone());
        let center = scene
            .get(self.node)
            .map(|n| n.transform.position)
            .unwrap_or(self.home);
        if let Some(label) = &mut self.top_label {
            label.show_at(center + Vec3::Y * offsets.top);
        }
        if let Some(label) = &mut self.bottom_label {
            label.show_at(center + Vec3::Y * offsets.bottom);
        }
        self.highlighted = true;
    }

    /// Restore the default material and hide the labels. Idempotent.
    pub fn clear_highlight(&mut self, scene: &mut SceneGraph) {
        scene.set_material(self.node, self.default_material.clone());
        if let Some(label) = &mut self.top_label {
            label.hide();
        }
        if let Some(label) = &mut self.bottom_label {
            label.hide();
        }
        self.highlighted = false;
    }

    /// Send the body home upright and at rest, then give it a random spin in
    /// `[-spin_range, spin_range)` per axis. Returns the spin applied.
    pub fn reset<P, R>(
        &self,
        physics: &mut P,
        rng: &mut R,
        spin_range: f32,
    ) -> Result<Vec3, PhysicsError>
    where
        P: PhysicsBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let spin = if spin_range > 0.0 {
            Vec3::new(
                rng.random_range(-spin_range..spin_range),
                rng.random_range(-spin_range..spin_range),
                rng.random_range(-spin_range..spin_range),
            )
        } else {
            Vec3::ZERO
        };
        physics.set_position(self.body, self.home)?;
        physics.set_rotation(self.body, Quat::IDENTITY)?;
        physics.set_linear_velocity(self.body, Vec3::ZERO)?;
        physics.set_angular_velocity(self.body, spin)?;
        tracing::trace!(id = %self.id, exhibit = %self.name, ?spin, "reset");
        Ok(spin)
    }
}

fn surface_material(scene: &SceneGraph, name: &str, source: &SurfaceSource) -> Material {
    let fallback = Material::flat(Color::RED);
    match source {
        SurfaceSource::Default => Material::Normal,
        SurfaceSource::StaticImage(id) | SurfaceSource::VideoStream(id) => {
            match scene.textures().get(*id) {
                Some(texture) => {
                    if texture.is_video() != matches!(source, SurfaceSource::VideoStream(_)) {
                        tracing::warn!(
                            exhibit = name,
                            ?id,
                            "surface kind does not match texture kind"
                        );
                    }
                    Material::textured(*id)
                }
                None => {
                    tracing::error!(
                        exhibit = name,
                        ?id,
                        "texture not found, using fallback material"
                    );
                    fallback
                }
            }
        }
        SurfaceSource::Unrecognized(kind) => {
            tracing::error!(
                exhibit = name,
                kind = %kind,
                "unrecognized surface source, using fallback material"
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_physics::RapierWorld;
    use folio_scene::{Texture, VideoTexture};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (RapierWorld, SceneGraph) {
        (RapierWorld::new(Vec3::new(0.0, -9.82, 0.0)), SceneGraph::new())
    }

    #[test]
    fn create_places_body_and_node_at_spawn() {
        let (mut physics, mut scene) = setup();
        let spawn = Vec3::new(4.0, 8.0, 0.0);
        let e = Exhibit::create(&mut physics, &mut scene, "nerf", spawn, SurfaceSource::Default);

        assert_eq!(e.home(), spawn);
        assert_eq!(physics.body_state(e.body()).unwrap().position, spawn);
        let node = scene.get(e.node()).unwrap();
        assert_eq!(node.transform.position, spawn);
        assert_eq!(node.geometry.half_extents(), Vec3::splat(2.0));
        assert_eq!(node.material.kind(), "normal");
        assert!(!e.is_highlighted());
    }

    #[test]
    fn video_surface_is_textured() {
        let (mut physics, mut scene) = setup();
        let tex = scene
            .textures_mut()
            .insert(Texture::Video(VideoTexture::new("assets/nerf.mp4", Color::WHITE)));
        let source = SurfaceSource::VideoStream(tex);
        let e = Exhibit::create(&mut physics, &mut scene, "nerf", Vec3::ZERO, source);
        assert_eq!(e.default_material().map(), Some(tex));
    }

    #[test]
    fn unrecognized_surface_falls_back_to_red() {
        let (mut physics, mut scene) = setup();
        let e = Exhibit::create(
            &mut physics,
            &mut scene,
            "odd",
            Vec3::ZERO,
            SurfaceSource::Unrecognized("hologram".into()),
        );
        assert_eq!(**e.default_material(), Material::flat(Color::RED));
        assert_eq!(scene.len(), 1);
        assert_eq!(physics.body_count(), 1);
    }

    #[test]
    fn missing_texture_falls_back_to_red() {
        let (mut physics, mut scene) = setup();
        let e = Exhibit::create(
            &mut physics,
            &mut scene,
            "ghost",
            Vec3::ZERO,
            SurfaceSource::StaticImage(TextureId(99)),
        );
        assert_eq!(**e.default_material(), Material::flat(Color::RED));
    }

    #[test]
    fn highlight_then_clear_restores_the_same_material() {
        let (mut physics, mut scene) = setup();
        let spawn = Vec3::new(0.0, 20.0, 0.0);
        let mut e = Exhibit::create(&mut physics, &mut scene, "me", spawn, SurfaceSource::Default)
            .with_top_label(Label::new("Me", "I like to build cool stuff."));
        let initial = scene.get(e.node()).unwrap().material.clone();

        e.highlight(&mut scene, LabelOffsets::default());
        assert!(e.is_highlighted());
        assert_eq!(scene.get(e.node()).unwrap().material.kind(), "outline");
        let top = e.top_label().unwrap();
        assert!(top.is_visible());
        assert_eq!(top.anchor(), Vec3::new(0.0, 24.0, 0.0));

        e.clear_highlight(&mut scene);
        assert!(!e.is_highlighted());
        assert!(Arc::ptr_eq(&scene.get(e.node()).unwrap().material, &initial));
        assert!(!e.top_label().unwrap().is_visible());
    }

    #[test]
    fn clear_highlight_is_idempotent() {
        let (mut physics, mut scene) = setup();
        let mut e =
            Exhibit::create(&mut physics, &mut scene, "plant", Vec3::ZERO, SurfaceSource::Default)
                .with_top_label(Label::new("a", "b"))
                .with_bottom_label(Label::new("c", "d"));
        e.clear_highlight(&mut scene);
        e.clear_highlight(&mut scene);
        assert!(!e.is_highlighted());
        assert!(Arc::ptr_eq(&scene.get(e.node()).unwrap().material, e.default_material()));
        assert!(e.labels().all(|l| !l.is_visible()));
    }

    #[test]
    fn outline_wraps_own_texture() {
        let (mut physics, mut scene) = setup();
        let tex = scene
            .textures_mut()
            .insert(Texture::Video(VideoTexture::new("assets/sdxl.mp4", Color::WHITE)));
        let source = SurfaceSource::VideoStream(tex);
        let mut e = Exhibit::create(&mut physics, &mut scene, "SDXL", Vec3::ZERO, source);
        e.highlight(&mut scene, LabelOffsets::default());
        match &*scene.get(e.node()).unwrap().material {
            Material::Outline(params) => {
                assert_eq!(params.texture, Some(tex));
                assert_eq!(params.color, Color::CYAN);
            }
            other => panic!("expected outline, got {other:?}"),
        }
    }

    #[test]
    fn reset_restores_home_at_rest() {
        let (mut physics, mut scene) = setup();
        let home = Vec3::new(-2.0, 15.0, 2.0);
        let e = Exhibit::create(&mut physics, &mut scene, "plant", home, SurfaceSource::Default);
        e.set_spin(&mut physics, Vec3::new(1.0, 0.0, 2.0)).unwrap();
        for _ in 0..50 {
            physics.step(0.01);
        }
        assert_ne!(physics.body_state(e.body()).unwrap().position, home);

        let mut rng = StdRng::seed_from_u64(3);
        let spin = e.reset(&mut physics, &mut rng, 1.0).unwrap();
        let state = physics.body_state(e.body()).unwrap();
        assert_eq!(state.position, home);
        assert!(state.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
        assert_eq!(state.linear_velocity, Vec3::ZERO);
        assert_eq!(state.angular_velocity, spin);
        assert!(spin.cmpge(Vec3::splat(-1.0)).all() && spin.cmplt(Vec3::ONE).all());
    }

    #[test]
    fn zero_spin_range_resets_without_spin() {
        let (mut physics, mut scene) = setup();
        let e = Exhibit::create(&mut physics, &mut scene, "me", Vec3::Y, SurfaceSource::Default);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(e.reset(&mut physics, &mut rng, 0.0).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn sync_copies_pose() {
        let (mut physics, mut scene) = setup();
        let spawn = Vec3::new(0.0, 10.0, 0.0);
        let e = Exhibit::create(&mut physics, &mut scene, "nerf", spawn, SurfaceSource::Default);
        physics.step(0.01);
        e.sync_from_physics(&physics, &mut scene);
        let state = physics.body_state(e.body()).unwrap();
        let node = scene.get(e.node()).unwrap();
        assert_eq!(node.transform.position, state.position);
        assert!(node.transform.position.y < 10.0);
        assert_eq!(node.transform.scale, Vec3::ONE);
    }
}
