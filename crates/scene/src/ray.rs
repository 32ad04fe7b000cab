use crate::graph::{NodeId, SceneGraph};
use folio_common::Transform;
use glam::Vec3;

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// `direction` is normalized; a zero direction yields a ray that hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// One ray/node intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

/// Distance along `ray` to the front face of an oriented box.
///
/// The box is centred on `transform.position` with the given half extents
/// before scaling. Rays starting inside the box do not hit it.
pub fn intersect_box(ray: &Ray, transform: &Transform, half_extents: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    if ray.direction == Vec3::ZERO {
        return None;
    }

    // Work in box space; the ray parameter is unchanged because the mapping is affine.
    let inv_rot = transform.rotation.inverse();
    let scale = transform.scale;
    let origin = inv_rot * (ray.origin - transform.position) / scale;
    let dir = inv_rot * ray.direction / scale;

    let inv = |d: f32| {
        if d.abs() < EPSILON {
            1.0 / EPSILON.copysign(d)
        } else {
            1.0 / d
        }
    };
    let inv_dir = Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z));

    let t0 = (-half_extents - origin) * inv_dir;
    let t1 = (half_extents - origin) * inv_dir;
    let t_near = t0.min(t1).max_element();
    let t_far = t0.max(t1).min_element();

    if t_near > t_far || t_near < 0.0 {
        return None;
    }
    Some(t_near)
}

impl SceneGraph {
    /// Intersect `ray` with the candidate nodes, nearest first.
    ///
    /// Candidates that are not in the graph are skipped. Equal distances keep
    /// candidate order.
    pub fn raycast(&self, ray: &Ray, candidates: impl IntoIterator<Item = NodeId>) -> Vec<Hit> {
        let mut hits: Vec<Hit> = candidates
            .into_iter()
            .filter_map(|id| {
                let node = self.get(id)?;
                let distance = intersect_box(ray, &node.transform, node.geometry.half_extents())?;
                Some(Hit { node: id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Geometry, Node};
    use crate::material::Material;
    use glam::Quat;
    use std::sync::Arc;

    fn box_node(position: Vec3) -> Node {
        Node::new(
            "box",
            Geometry::cube(4.0),
            Arc::new(Material::Normal),
            Transform::from_position(position),
        )
    }

    #[test]
    fn hit_front_face() {
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X);
        let t = intersect_box(&ray, &Transform::default(), Vec3::splat(2.0)).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
        assert!((ray.origin + ray.direction * t).abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn miss_beside_box() {
        let ray = Ray::new(Vec3::new(-10.0, 3.0, 0.0), Vec3::X);
        assert!(intersect_box(&ray, &Transform::default(), Vec3::splat(2.0)).is_none());
    }

    #[test]
    fn box_behind_origin_is_missed() {
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::X);
        assert!(intersect_box(&ray, &Transform::default(), Vec3::splat(2.0)).is_none());
    }

    #[test]
    fn ray_from_inside_is_missed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(intersect_box(&ray, &Transform::default(), Vec3::splat(2.0)).is_none());
    }

    #[test]
    fn rotation_is_respected() {
        // A 45° turn puts a corner at z = 2√2, so this ray now clips it.
        let transform = Transform {
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            ..Transform::default()
        };
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 2.5), Vec3::X);
        assert!(intersect_box(&ray, &Transform::default(), Vec3::splat(2.0)).is_none());
        assert!(intersect_box(&ray, &transform, Vec3::splat(2.0)).is_some());
    }

    #[test]
    fn scale_grows_the_box() {
        let transform = Transform {
            scale: Vec3::splat(2.0),
            ..Transform::default()
        };
        let ray = Ray::new(Vec3::new(-10.0, 3.0, 0.0), Vec3::X);
        let t = intersect_box(&ray, &transform, Vec3::splat(2.0)).unwrap();
        assert!((t - 6.0).abs() < 1e-4);
    }

    #[test]
    fn raycast_orders_by_distance() {
        let mut scene = SceneGraph::new();
        let far = scene.insert(box_node(Vec3::new(20.0, 0.0, 0.0)));
        let near = scene.insert(box_node(Vec3::new(10.0, 0.0, 0.0)));
        let off = scene.insert(box_node(Vec3::new(10.0, 10.0, 0.0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hits = scene.raycast(&ray, [far, near, off]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn raycast_only_considers_candidates() {
        let mut scene = SceneGraph::new();
        scene.insert(box_node(Vec3::new(10.0, 0.0, 0.0)));
        let b = scene.insert(box_node(Vec3::new(20.0, 0.0, 0.0)));
        let missing = NodeId(b.0 + 1);

        let hits = scene.raycast(&Ray::new(Vec3::ZERO, Vec3::X), [missing, b]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, b);
    }
}
