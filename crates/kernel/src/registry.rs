use crate::exhibit::Exhibit;
use folio_scene::NodeId;

/// Every exhibit in the showcase, in creation order.
///
/// Iteration order is stable; hover and reset passes rely on it.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    exhibits: Vec<Exhibit>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exhibit and return its index.
    pub fn register(&mut self, exhibit: Exhibit) -> usize {
        self.exhibits.push(exhibit);
        self.exhibits.len() - 1
    }

    pub fn len(&self) -> usize {
        self.exhibits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exhibits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exhibit> {
        self.exhibits.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Exhibit> {
        self.exhibits.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exhibit> {
        self.exhibits.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Exhibit> {
        self.exhibits.iter_mut()
    }

    /// Index of the exhibit rendered by `node`.
    pub fn index_of_node(&self, node: NodeId) -> Option<usize> {
        self.exhibits.iter().position(|e| e.node() == node)
    }

    pub fn find(&self, name: &str) -> Option<&Exhibit> {
        self.exhibits.iter().find(|e| e.name() == name)
    }

    /// Nodes of all exhibits, in registry order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.exhibits.iter().map(Exhibit::node)
    }

    pub fn highlighted_count(&self) -> usize {
        self.exhibits.iter().filter(|e| e.is_highlighted()).count()
    }
}
