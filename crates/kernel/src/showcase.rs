use crate::config::{
    ConfigError, ExhibitConfig, FloorConfig, LabelOffsets, ShowcaseConfig, SurfaceSpec,
};
use crate::exhibit::{Exhibit, SurfaceSource};
use crate::interaction::InteractionState;
use crate::registry::SceneRegistry;
use crate::reset::ResetController;
use folio_common::Transform;
use folio_input::{Action, Key, KeyAction, KeyBindings};
use folio_physics::{BodyDesc, BodyHandle, PhysicsBackend, RapierWorld};
use folio_scene::{
    Color, Geometry, ImageTexture, Label, Material, Node, NodeId, OrbitCamera, ProjectedLabel,
    SceneGraph, Texture, VideoTexture, Viewport, project_label,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

/// The static slab the exhibits land on.
#[derive(Debug, Clone, Copy)]
pub struct Floor {
    pub body: BodyHandle,
    pub node: NodeId,
}

impl Floor {
    fn create<P>(physics: &mut P, scene: &mut SceneGraph, cfg: &FloorConfig) -> Self
    where
        P: PhysicsBackend + ?Sized,
    {
        let desc = BodyDesc::fixed_cuboid(cfg.collider_half_extents, cfg.position);
        let body = physics.create_body(&desc);
        let node = scene.insert(Node::new(
            "floor",
            Geometry::Box { size: cfg.size },
            Arc::new(Material::glass()),
            Transform::from_position(cfg.position),
        ));
        scene.set_visible(node, cfg.visible);
        Self { body, node }
    }

    pub fn sync<P: PhysicsBackend + ?Sized>(&self, physics: &P, scene: &mut SceneGraph) {
        match physics.body_state(self.body) {
            Ok(state) => {
                if let Some(node) = scene.get_mut(self.node) {
                    node.transform.position = state.position;
                    node.transform.rotation = state.rotation;
                }
            }
            Err(e) => tracing::warn!("skipping floor sync: {e}"),
        }
    }
}

/// Application context: physics world, scene, camera, exhibits and input
/// state, built once at startup and handed to the frame loop.
pub struct Showcase<P: PhysicsBackend = RapierWorld> {
    physics: P,
    scene: SceneGraph,
    camera: OrbitCamera,
    viewport: Viewport,
    registry: SceneRegistry,
    interaction: InteractionState,
    reset: ResetController,
    bindings: KeyBindings,
    rng: StdRng,
    label_offsets: LabelOffsets,
    max_step: f32,
    floor: Floor,
}

impl Showcase<RapierWorld> {
    /// Build a showcase backed by rapier.
    pub fn from_config(config: &ShowcaseConfig) -> Result<Self, ConfigError> {
        Self::with_backend(RapierWorld::new(config.physics.gravity), config)
    }
}

impl<P: PhysicsBackend> Showcase<P> {
    /// Build a showcase on an existing physics backend.
    pub fn with_backend(mut physics: P, config: &ShowcaseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        physics.set_gravity(config.physics.gravity);

        let c = &config.camera;
        let viewport = Viewport::default();
        let mut camera = OrbitCamera::looking_at(c.position, c.target);
        camera.fov = c.fov_degrees.to_radians();
        camera.near = c.near;
        camera.far = c.far;
        camera.damping = c.damping;
        camera.rotate_speed = c.rotate_speed;
        camera.zoom_speed = c.zoom_speed;
        camera.aspect = viewport.width / viewport.height;

        let mut bindings = KeyBindings::empty();
        bindings.bind(config.reset_key()?, KeyAction::Reset);

        let mut scene = SceneGraph::new();
        let floor = Floor::create(&mut physics, &mut scene, &config.floor);

        let mut showcase = Self {
            physics,
            scene,
            camera,
            viewport,
            registry: SceneRegistry::new(),
            interaction: InteractionState::new(),
            reset: ResetController::new(config.physics.spin_range),
            bindings,
            rng: StdRng::seed_from_u64(config.seed),
            label_offsets: config.labels,
            max_step: config.physics.max_step,
            floor,
        };
        for exhibit in &config.exhibits {
            showcase.add_exhibit(exhibit);
        }

        tracing::info!(
            exhibits = showcase.registry.len(),
            textures = showcase.scene.textures().len(),
            seed = config.seed,
            "showcase ready"
        );
        Ok(showcase)
    }

    /// Create an exhibit from its description and register it.
    pub fn add_exhibit(&mut self, cfg: &ExhibitConfig) -> usize {
        let textures = self.scene.textures_mut();
        let source = match &cfg.surface {
            SurfaceSpec::Normal => SurfaceSource::Default,
            SurfaceSpec::Image { path, tint } => SurfaceSource::StaticImage(textures.insert(
                Texture::Image(ImageTexture {
                    source: path.clone(),
                    tint: tint.unwrap_or(Color::WHITE),
                }),
            )),
            SurfaceSpec::Video { path, tint } => SurfaceSource::VideoStream(textures.insert(
                Texture::Video(VideoTexture::new(path.clone(), tint.unwrap_or(Color::WHITE))),
            )),
            SurfaceSpec::Unsupported => SurfaceSource::Unrecognized("unsupported".into()),
        };

        let mut exhibit =
            Exhibit::create(&mut self.physics, &mut self.scene, &cfg.name, cfg.position, source);
        if let Some(l) = &cfg.top_label {
            exhibit = exhibit.with_top_label(Label::new(&l.title, &l.body));
        }
        if let Some(l) = &cfg.bottom_label {
            exhibit = exhibit.with_bottom_label(Label::new(&l.title, &l.body));
        }
        if let Err(e) = exhibit.set_spin(&mut self.physics, cfg.spin) {
            tracing::warn!(exhibit = %cfg.name, "initial spin not applied: {e}");
        }
        self.registry.register(exhibit)
    }

    /// Apply a high-level input action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Reset => {
                self.reset_all();
            }
            Action::Orbit(delta) => self.camera.orbit(delta.x, delta.y),
            Action::Zoom(amount) => self.camera.zoom(amount),
            Action::Noop => {}
        }
    }

    /// Look up `key` in the bindings and apply the result.
    pub fn press_key(&mut self, key: Key) {
        let action = self.bindings.map_key(key);
        self.apply(action);
    }

    /// Reset every exhibit. Returns how many were reset.
    pub fn reset_all(&mut self) -> usize {
        self.reset
            .handle(Action::Reset, &self.registry, &mut self.physics, &mut self.rng)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_viewport(width, height);
        tracing::debug!(width, height, "viewport resized");
    }

    /// Apply damped camera motion. Returns true if the camera moved.
    pub fn update_camera(&mut self) -> bool {
        self.camera.update()
    }

    /// Refresh every video texture. Returns how many were refreshed.
    pub fn refresh_textures(&mut self) -> usize {
        self.scene.textures_mut().refresh_all()
    }

    /// Hover pass along the screen-centre ray.
    pub fn hover(&mut self) -> Option<usize> {
        self.interaction
            .hover_pass(&mut self.registry, &mut self.scene, &self.camera, self.label_offsets)
    }

    pub fn step_physics(&mut self, dt: f32) {
        self.physics.step(dt);
    }

    /// Copy body poses onto exhibit nodes, then onto the floor node.
    pub fn sync(&mut self) {
        for exhibit in self.registry.iter() {
            exhibit.sync_from_physics(&self.physics, &mut self.scene);
        }
        self.floor.sync(&self.physics, &mut self.scene);
    }

    /// Visible labels resolved to pixels, in registry order.
    pub fn projected_labels(&self) -> Vec<ProjectedLabel> {
        self.registry
            .iter()
            .flat_map(Exhibit::labels)
            .filter_map(|label| project_label(label, &self.camera, self.viewport))
            .collect()
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn hovered(&self) -> Option<usize> {
        self.interaction.hovered()
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn max_step(&self) -> f32 {
        self.max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec2, Vec3};

    #[test]
    fn default_config_builds_portfolio() {
        let s = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        assert_eq!(s.registry().len(), 7);
        // seven exhibit bodies plus the floor
        assert_eq!(s.physics().body_count(), 8);
        assert_eq!(s.scene().len(), 8);
        // six videos and one image
        assert_eq!(s.scene().textures().len(), 7);
        assert!(!s.scene().get(s.floor().node).unwrap().visible);
        assert_eq!(s.max_step(), 0.01);

        let me = s.registry().find("me").unwrap();
        assert_eq!(me.home(), Vec3::new(0.0, 20.0, 0.0));
        assert!(me.bottom_label().is_none());
        let spin = s.physics().body_state(me.body()).unwrap().angular_velocity;
        assert_eq!(spin, Vec3::new(1.0, 5.0, 0.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ShowcaseConfig::default();
        config.physics.max_step = -1.0;
        assert!(Showcase::from_config(&config).is_err());
    }

    #[test]
    fn unsupported_surface_uses_fallback() {
        let mut config = ShowcaseConfig::default();
        config.exhibits.truncate(1);
        config.exhibits[0].surface = SurfaceSpec::Unsupported;
        let s = Showcase::from_config(&config).unwrap();
        let e = s.registry().get(0).unwrap();
        assert_eq!(**e.default_material(), Material::flat(Color::RED));
    }

    #[test]
    fn enter_key_resets() {
        let mut s = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        for _ in 0..30 {
            s.step_physics(0.01);
        }
        s.press_key(Key::Enter);
        for e in s.registry().iter() {
            let state = s.physics().body_state(e.body()).unwrap();
            assert_eq!(state.position, e.home());
            assert!(state.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
        }
    }

    #[test]
    fn custom_reset_key() {
        let mut config = ShowcaseConfig::default();
        config.controls.reset_key = "r".into();
        let mut s = Showcase::from_config(&config).unwrap();
        s.step_physics(0.01);
        s.press_key(Key::Enter);
        let e = s.registry().get(0).unwrap();
        assert_ne!(s.physics().body_state(e.body()).unwrap().position, e.home());
        s.press_key(Key::Char('r'));
        let e = s.registry().get(0).unwrap();
        assert_eq!(s.physics().body_state(e.body()).unwrap().position, e.home());
    }

    #[test]
    fn empty_showcase_reset_is_noop() {
        let config = ShowcaseConfig {
            exhibits: Vec::new(),
            ..ShowcaseConfig::default()
        };
        let mut s = Showcase::from_config(&config).unwrap();
        assert_eq!(s.reset_all(), 0);
        assert_eq!(s.physics().body_count(), 1);
    }

    #[test]
    fn orbit_action_moves_camera_after_update() {
        let mut s = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        let before = s.camera().position();
        s.apply(Action::Orbit(Vec2::new(100.0, 0.0)));
        assert!(s.update_camera());
        assert_ne!(s.camera().position(), before);
    }

    #[test]
    fn resize_updates_viewport_and_aspect() {
        let mut s = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        s.resize(800, 800);
        assert_eq!(s.viewport(), Viewport::new(800, 800));
        assert_eq!(s.camera().aspect, 1.0);
    }

    #[test]
    fn floor_node_follows_its_body() {
        let mut s = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        let floor = s.floor();
        let moved = Vec3::new(1.0, -3.0, 2.0);
        let tilt = Quat::from_rotation_z(0.1);
        s.physics_mut().set_position(floor.body, moved).unwrap();
        s.physics_mut().set_rotation(floor.body, tilt).unwrap();

        s.sync();
        let node = s.scene().get(floor.node).unwrap();
        assert_eq!(node.transform.position, moved);
        assert!(node.transform.rotation.abs_diff_eq(tilt, 1e-6));
    }

    #[test]
    fn independent_instances() {
        let mut a = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        let b = Showcase::from_config(&ShowcaseConfig::default()).unwrap();
        for _ in 0..10 {
            a.step_physics(0.01);
        }
        assert!(a.physics().simulated_time() > 0.0);
        assert_eq!(b.physics().simulated_time(), 0.0);
    }
}
