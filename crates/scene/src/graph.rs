use crate::material::{Material, TextureStore};
use folio_common::Transform;
use glam::Vec3;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identifier of a node in a [`SceneGraph`]. Ids increase with insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Shape of a node's mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centred on the node origin, given by full edge lengths.
    Box { size: Vec3 },
}

impl Geometry {
    pub fn cube(edge: f32) -> Self {
        Self::Box {
            size: Vec3::splat(edge),
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        match self {
            Self::Box { size } => *size * 0.5,
        }
    }
}

/// A drawable mesh with one material.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub geometry: Geometry,
    pub material: Arc<Material>,
    pub transform: Transform,
    pub visible: bool,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        geometry: Geometry,
        material: Arc<Material>,
        transform: Transform,
    ) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform,
            visible: true,
        }
    }
}

/// Renderable scene: nodes plus the textures their materials reference.
///
/// Nodes iterate in insertion order (BTreeMap keyed by increasing id), so
/// draw order and ray-query tie breaks are stable.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    textures: TextureStore,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        tracing::debug!(node = id.0, name = %node.name, "inserted scene node");
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn set_material(&mut self, id: NodeId, material: Arc<Material>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.material = material;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn node(name: &str) -> Node {
        Node::new(
            name,
            Geometry::cube(4.0),
            Arc::new(Material::Normal),
            Transform::default(),
        )
    }

    #[test]
    fn graph_starts_empty() {
        let g = SceneGraph::new();
        assert!(g.is_empty());
        assert!(g.textures().is_empty());
    }

    #[test]
    fn insert_and_lookup() {
        let mut g = SceneGraph::new();
        let id = g.insert(node("a"));
        assert_eq!(g.len(), 1);
        assert_eq!(g.get(id).unwrap().name, "a");
        assert!(g.get(NodeId(id.0 + 1)).is_none());
        assert!(!g.set_visible(NodeId(id.0 + 1), false));
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut g = SceneGraph::new();
        let ids: Vec<NodeId> = (0..5).map(|i| g.insert(node(&format!("n{i}")))).collect();
        let iterated: Vec<NodeId> = g.nodes().map(|(id, _)| id).collect();
        assert_eq!(iterated, ids);
    }

    #[test]
    fn setters_update_node() {
        let mut g = SceneGraph::new();
        let id = g.insert(node("a"));
        let red = Arc::new(Material::flat(Color::RED));
        assert!(g.set_material(id, red.clone()));
        assert!(g.set_visible(id, false));
        g.get_mut(id).unwrap().transform = Transform::from_position(Vec3::Y);

        let n = g.get(id).unwrap();
        assert!(Arc::ptr_eq(&n.material, &red));
        assert!(!n.visible);
        assert_eq!(n.transform.position, Vec3::Y);
    }

    #[test]
    fn box_half_extents() {
        let g = Geometry::Box {
            size: Vec3::new(20.0, 1.0, 20.0),
        };
        assert_eq!(g.half_extents(), Vec3::new(10.0, 0.5, 10.0));
    }
}
