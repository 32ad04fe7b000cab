use crate::backend::{
    BodyDesc, BodyHandle, BodyKind, BodyState, PhysicsBackend, PhysicsError, Shape,
};
use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// Physics world backed by rapier3d.
///
/// Holds the full rapier pipeline state. Bodies are created with exactly one
/// collider each.
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    simulated_time: f64,
    steps: u64,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            simulated_time: 0.0,
            steps: 0,
        }
    }

    /// Number of non-empty steps taken.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn body(&self, handle: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.bodies
            .get(to_raw(handle))
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies
            .get_mut(to_raw(handle))
            .ok_or(PhysicsError::UnknownBody(handle))
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl PhysicsBackend for RapierWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .translation(to_vector(desc.position))
            .rotation(to_vector(desc.rotation.to_scaled_axis()))
            .angvel(to_vector(desc.angular_velocity))
            .build();
        let raw = self.bodies.insert(body);

        let Shape::Cuboid { half_extents } = desc.shape;
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let collider = match desc.kind {
            BodyKind::Dynamic => collider.mass(desc.mass),
            BodyKind::Fixed => collider,
        };
        self.colliders
            .insert_with_parent(collider.build(), raw, &mut self.bodies);

        let handle = from_raw(raw);
        tracing::debug!(%handle, kind = ?desc.kind, "created body");
        handle
    }

    fn step(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.simulated_time += dt as f64;
        self.steps += 1;
    }

    fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
    }

    fn body_state(&self, handle: BodyHandle) -> Result<BodyState, PhysicsError> {
        let body = self.body(handle)?;
        let t = body.translation();
        let lv = body.linvel();
        let av = body.angvel();
        Ok(BodyState {
            position: Vec3::new(t.x, t.y, t.z),
            rotation: from_rotation(body.rotation()),
            linear_velocity: Vec3::new(lv.x, lv.y, lv.z),
            angular_velocity: Vec3::new(av.x, av.y, av.z),
        })
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?
            .set_translation(to_vector(position), true);
        Ok(())
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) -> Result<(), PhysicsError> {
        self.body_mut(handle)?
            .set_rotation(to_rotation(rotation), true);
        Ok(())
    }

    fn set_linear_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: Vec3,
    ) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_linvel(to_vector(velocity), true);
        Ok(())
    }

    fn set_angular_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: Vec3,
    ) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_angvel(to_vector(velocity), true);
        Ok(())
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn simulated_time(&self) -> f64 {
        self.simulated_time
    }
}

fn to_raw(handle: BodyHandle) -> RigidBodyHandle {
    RigidBodyHandle::from_raw_parts(handle.index, handle.generation)
}

fn from_raw(raw: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = raw.into_raw_parts();
    BodyHandle { index, generation }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

// nalgebra stores quaternions as (i, j, k, w); glam as (x, y, z, w).
fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn from_rotation(r: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(position: Vec3) -> BodyDesc {
        BodyDesc::dynamic_cuboid(Vec3::splat(2.0), 1.0, position)
    }

    #[test]
    fn world_starts_empty() {
        let w = RapierWorld::default();
        assert_eq!(w.body_count(), 0);
        assert_eq!(w.simulated_time(), 0.0);
    }

    #[test]
    fn create_body_reports_spawn_state() {
        let mut w = RapierWorld::new(Vec3::new(0.0, -9.82, 0.0));
        let h = w.create_body(&unit_box(Vec3::new(0.0, 5.0, 4.0)).with_angular_velocity(Vec3::Y));
        let s = w.body_state(h).unwrap();
        assert_eq!(s.position, Vec3::new(0.0, 5.0, 4.0));
        assert!(s.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
        assert_eq!(s.angular_velocity, Vec3::Y);
        assert_eq!(w.body_count(), 1);
    }

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut w = RapierWorld::new(Vec3::new(0.0, -9.82, 0.0));
        let h = w.create_body(&unit_box(Vec3::new(0.0, 10.0, 0.0)));
        for _ in 0..30 {
            w.step(0.01);
        }
        let s = w.body_state(h).unwrap();
        assert!(s.position.y < 10.0);
        assert!(s.linear_velocity.y < 0.0);
        assert_eq!(w.steps(), 30);
    }

    #[test]
    fn fixed_body_stays_put() {
        let mut w = RapierWorld::default();
        let h = w.create_body(&BodyDesc::fixed_cuboid(
            Vec3::new(20.0, 0.5, 20.0),
            Vec3::new(0.0, -2.0, 0.0),
        ));
        for _ in 0..10 {
            w.step(0.01);
        }
        assert_eq!(w.body_state(h).unwrap().position, Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn non_positive_step_is_ignored() {
        let mut w = RapierWorld::default();
        let h = w.create_body(&unit_box(Vec3::new(0.0, 10.0, 0.0)));
        w.step(0.0);
        w.step(-1.0);
        assert_eq!(w.steps(), 0);
        assert_eq!(w.simulated_time(), 0.0);
        assert_eq!(w.body_state(h).unwrap().position.y, 10.0);
    }

    #[test]
    fn simulated_time_accumulates() {
        let mut w = RapierWorld::default();
        w.step(0.01);
        w.step(0.005);
        assert!((w.simulated_time() - 0.015).abs() < 1e-6);
    }

    #[test]
    fn state_writes_read_back_exactly() {
        let mut w = RapierWorld::default();
        let h = w.create_body(&unit_box(Vec3::ZERO));
        w.step(0.01);

        w.set_position(h, Vec3::new(-4.0, 10.0, 0.0)).unwrap();
        w.set_rotation(h, Quat::IDENTITY).unwrap();
        w.set_linear_velocity(h, Vec3::ZERO).unwrap();
        w.set_angular_velocity(h, Vec3::new(0.5, -0.25, 0.75)).unwrap();

        let s = w.body_state(h).unwrap();
        assert_eq!(s.position, Vec3::new(-4.0, 10.0, 0.0));
        assert_eq!(s.rotation, Quat::IDENTITY);
        assert_eq!(s.linear_velocity, Vec3::ZERO);
        assert_eq!(s.angular_velocity, Vec3::new(0.5, -0.25, 0.75));
    }

    #[test]
    fn rotation_conversion_preserves_orientation() {
        let q = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(0.3);
        let back = from_rotation(&to_rotation(q));
        assert!(back.abs_diff_eq(q, 1e-6));
    }

    #[test]
    fn foreign_handle_is_unknown() {
        let mut w = RapierWorld::default();
        w.create_body(&unit_box(Vec3::ZERO));
        let stray = BodyHandle {
            index: 7,
            generation: 0,
        };
        assert!(matches!(w.body_state(stray), Err(PhysicsError::UnknownBody(_))));
        assert!(w.set_position(stray, Vec3::ONE).is_err());
        assert_eq!(w.body_count(), 1);
    }

    #[test]
    fn gravity_is_configurable() {
        let mut w = RapierWorld::default();
        w.set_gravity(Vec3::new(0.0, -9.82, 0.0));
        assert_eq!(w.gravity(), Vec3::new(0.0, -9.82, 0.0));
    }
}
