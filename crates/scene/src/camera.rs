use crate::ray::Ray;
use glam::{Mat4, Vec2, Vec3, Vec4};

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Perspective camera orbiting a target point.
///
/// Pointer input accumulates as pending deltas; `update` applies a fraction
/// of them each frame so motion eases out. Camera motion is view state only
/// and never touches the physics world.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Angle around +Y, measured from +Z towards +X.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
    pub distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of pending motion applied per update. Zero applies it all at once.
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(7.0, 6.0, 8.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Camera at `position` orbiting `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 1.0,
            max_distance: 500.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Queue a drag of `dx, dy` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * self.rotate_speed;
        self.pending_pitch += dy * self.rotate_speed;
    }

    /// Queue a zoom; positive moves away from the target.
    pub fn zoom(&mut self, amount: f32) {
        self.pending_zoom += amount * self.zoom_speed;
    }

    /// Apply queued motion. Returns true if the camera moved.
    pub fn update(&mut self) -> bool {
        let factor = if self.damping > 0.0 {
            self.damping.min(1.0)
        } else {
            1.0
        };

        let dyaw = self.pending_yaw * factor;
        let dpitch = self.pending_pitch * factor;
        let dzoom = self.pending_zoom * factor;
        self.pending_yaw -= dyaw;
        self.pending_pitch -= dpitch;
        self.pending_zoom -= dzoom;

        let before = (self.yaw, self.pitch, self.distance);
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * dzoom.exp()).clamp(self.min_distance, self.max_distance);
        before != (self.yaw, self.pitch, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let origin = self.position();
        let inv = self.view_projection().inverse();
        let through = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(origin, through - origin)
    }

    /// Ray through the middle of the viewport.
    pub fn screen_center_ray(&self) -> Ray {
        self.ray_through_ndc(Vec2::ZERO)
    }

    /// Normalized device coordinates of a world point, or `None` if it lies
    /// behind the eye or outside the depth range.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        (0.0..=1.0).contains(&ndc.z).then_some(ndc)
    }
}
