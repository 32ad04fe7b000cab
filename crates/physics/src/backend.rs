use glam::{Quat, Vec3};

/// Opaque reference to a body owned by a physics world.
///
/// Exhibits hold these; the world keeps the body itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub index: u32,
    pub generation: u32,
}

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}.{}", self.index, self.generation)
    }
}

/// Whether the solver moves the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Fixed,
}

/// Collision shape attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
}

/// Everything needed to create one body with one collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: Shape,
    /// Ignored for fixed bodies.
    pub mass: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub angular_velocity: Vec3,
}

impl BodyDesc {
    /// A dynamic box of the given half extents and mass.
    pub fn dynamic_cuboid(half_extents: Vec3, mass: f32, position: Vec3) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape: Shape::Cuboid { half_extents },
            mass,
            position,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// A static box that never moves.
    pub fn fixed_cuboid(half_extents: Vec3, position: Vec3) -> Self {
        Self {
            kind: BodyKind::Fixed,
            shape: Shape::Cuboid { half_extents },
            mass: 0.0,
            position,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }
}

/// Snapshot of a body's kinematic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

/// Errors from physics world operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("{0} is not part of this physics world")]
    UnknownBody(BodyHandle),
}

/// The rigid-body world the showcase delegates simulation to.
///
/// Solver internals stay behind this trait: callers create bodies, advance
/// time, and read or overwrite per-body state.
pub trait PhysicsBackend {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Advance the world by `dt` seconds. Non-positive steps are ignored.
    fn step(&mut self, dt: f32);

    fn gravity(&self) -> Vec3;

    fn set_gravity(&mut self, gravity: Vec3);

    fn body_state(&self, handle: BodyHandle) -> Result<BodyState, PhysicsError>;

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) -> Result<(), PhysicsError>;

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) -> Result<(), PhysicsError>;

    fn set_linear_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: Vec3,
    ) -> Result<(), PhysicsError>;

    fn set_angular_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: Vec3,
    ) -> Result<(), PhysicsError>;

    fn body_count(&self) -> usize;

    /// Total simulated time in seconds across all steps taken so far.
    fn simulated_time(&self) -> f64;
}
