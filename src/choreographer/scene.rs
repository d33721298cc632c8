use raylib::prelude::*;

/// Index of a node inside the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single animatable scalar of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    PositionX,
    PositionY,
    PositionZ,
    Scale,
    RotationY,
    RotationZ,
    Opacity,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::PositionX,
        Property::PositionY,
        Property::PositionZ,
        Property::Scale,
        Property::RotationY,
        Property::RotationZ,
        Property::Opacity,
    ];
}

/// Local transform of a node. Rotations are radians; opacity is never
/// inherited from the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3,
    pub scale: Vector3,
    pub rotation_y: f32,
    pub rotation_z: f32,
    pub opacity: f32,
}

impl Transform {
    pub fn new(position: Vector3, scale: f32, opacity: f32) -> Self {
        Self {
            position,
            scale: Vector3::new(scale, scale, scale),
            rotation_y: 0.0,
            rotation_z: 0.0,
            opacity,
        }
    }

    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::PositionX => self.position.x,
            Property::PositionY => self.position.y,
            Property::PositionZ => self.position.z,
            Property::Scale     => self.scale.x,
            Property::RotationY => self.rotation_y,
            Property::RotationZ => self.rotation_z,
            Property::Opacity   => self.opacity,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::PositionX => self.position.x = value,
            Property::PositionY => self.position.y = value,
            Property::PositionZ => self.position.z = value,
            Property::Scale     => self.scale = Vector3::new(value, value, value),
            Property::RotationY => self.rotation_y = value,
            Property::RotationZ => self.rotation_z = value,
            Property::Opacity   => self.opacity = value.clamp(0.0, 1.0),
        }
    }
}

/// Affine world transform of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    matrix: Matrix,
}

impl WorldTransform {
    pub fn identity() -> Self {
        Self { matrix: Matrix::identity() }
    }

    // raylib's matrix product applies the left operand first: scale, then
    // the z and y rotations, then the translation.
    fn from_local(local: &Transform) -> Self {
        let matrix = Matrix::scale(local.scale.x, local.scale.y, local.scale.z)
            * Matrix::rotate_z(local.rotation_z)
            * Matrix::rotate_y(local.rotation_y)
            * Matrix::translate(local.position.x, local.position.y, local.position.z);
        Self { matrix }
    }

    /// `self` applied after `child`.
    fn then(&self, child: &WorldTransform) -> WorldTransform {
        WorldTransform { matrix: child.matrix * self.matrix }
    }

    pub fn origin(&self) -> Vector3 {
        Vector3::new(self.matrix.m12, self.matrix.m13, self.matrix.m14)
    }

    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        p.transform_with(self.matrix)
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
    /// Whether this node paints an image layer or is a pure group.
    pub drawable: bool,
    aspect: Option<f32>,
}

impl SceneNode {
    /// Width / height of the node's image, 1:1 until locked.
    pub fn aspect(&self) -> f32 {
        self.aspect.unwrap_or(1.0)
    }
}

/// Arena-backed node hierarchy. Parents own their children by index; the
/// first node added without a parent is the root group.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_group(&mut self, name: &str, parent: Option<NodeId>, local: Transform) -> NodeId {
        self.add(name, parent, local, false)
    }

    pub fn add_layer(&mut self, name: &str, parent: Option<NodeId>, local: Transform) -> NodeId {
        self.add(name, parent, local, true)
    }

    fn add(&mut self, name: &str, parent: Option<NodeId>, local: Transform, drawable: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            local,
            drawable,
            aspect: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId, property: Property) -> f32 {
        self.nodes[id.0].local.get(property)
    }

    #[cfg(test)]
    pub fn set(&mut self, id: NodeId, property: Property, value: f32) {
        self.nodes[id.0].local.set(property, value);
    }

    pub fn set_local(&mut self, id: NodeId, local: Transform) {
        self.nodes[id.0].local = local;
    }

    /// Locks the aspect ratio of a layer from its image's natural size.
    /// Only the first call takes effect; missing or degenerate sizes lock
    /// the 1:1 fallback. Returns whether the lock was applied.
    pub fn lock_aspect(&mut self, id: NodeId, natural_size: Option<(u32, u32)>) -> bool {
        let node = &mut self.nodes[id.0];
        if node.aspect.is_some() {
            return false;
        }
        node.aspect = Some(match natural_size {
            Some((w, h)) if w > 0 && h > 0 => w as f32 / h as f32,
            _ => 1.0,
        });
        true
    }

    /// `id` and every node below it, parents before children.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// Composes every ancestor's local transform down to `id`.
    pub fn world_transform(&self, id: NodeId) -> WorldTransform {
        let mut chain = vec![id];
        let mut cursor = self.nodes[id.0].parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.nodes[parent.0].parent;
        }
        chain
            .iter()
            .rev()
            .fold(WorldTransform::identity(), |acc, node| {
                acc.then(&WorldTransform::from_local(&self.nodes[node.0].local))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vector3, b: Vector3) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    fn sample_scene() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.add_group("root", None, Transform::new(Vector3::new(1.0, 0.0, 0.0), 2.0, 1.0));
        let group = scene.add_group("group", Some(root), Transform::new(Vector3::new(0.0, 1.0, 0.0), 1.0, 1.0));
        let leaf = scene.add_layer("leaf", Some(group), Transform::new(Vector3::new(1.0, 0.0, 0.0), 1.0, 0.5));
        (scene, root, group, leaf)
    }

    #[test]
    fn test_world_transform_composes_ancestors() {
        let (scene, _, _, leaf) = sample_scene();
        let world = scene.world_transform(leaf);
        // root scales by 2, so the group offset and leaf offset are doubled.
        assert!(close(world.origin(), Vector3::new(3.0, 2.0, 0.0)));
    }

    #[test]
    fn test_parent_rotation_moves_children() {
        let (mut scene, root, _, leaf) = sample_scene();
        scene.set(root, Property::RotationZ, FRAC_PI_2);
        let world = scene.world_transform(leaf);
        assert!(close(world.origin(), Vector3::new(1.0 - 2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_parent_y_rotation_turns_children_away() {
        let (mut scene, root, _, leaf) = sample_scene();
        scene.set(root, Property::RotationY, FRAC_PI_2);
        let world = scene.world_transform(leaf);
        // (2, 2, 0) in the root frame; a quarter turn about y sends +x to -z.
        assert!(close(world.origin(), Vector3::new(1.0, 2.0, -2.0)));
        let right = world.transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert!(close(right, Vector3::new(1.0, 2.0, -4.0)));
    }

    #[test]
    fn test_opacity_is_not_inherited() {
        let (mut scene, root, _, leaf) = sample_scene();
        scene.set(root, Property::Opacity, 0.0);
        assert_eq!(scene.get(leaf, Property::Opacity), 0.5);
    }

    #[test]
    fn test_subtree_visit_order() {
        let (mut scene, root, group, leaf) = sample_scene();
        let sibling = scene.add_layer("sibling", Some(root), Transform::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 1.0));
        assert_eq!(scene.subtree(root), vec![root, group, leaf, sibling]);
        assert_eq!(scene.subtree(group), vec![group, leaf]);
    }

    #[test]
    fn test_aspect_locks_once() {
        let (mut scene, _, _, leaf) = sample_scene();
        assert_eq!(scene.node(leaf).aspect(), 1.0);
        assert!(scene.lock_aspect(leaf, Some((400, 200))));
        assert!(!scene.lock_aspect(leaf, Some((100, 100))));
        assert_eq!(scene.node(leaf).aspect(), 2.0);
    }

    #[test]
    fn test_aspect_fallback_on_missing_dimensions() {
        let (mut scene, root, group, _) = sample_scene();
        scene.lock_aspect(root, None);
        scene.lock_aspect(group, Some((0, 300)));
        assert_eq!(scene.node(root).aspect(), 1.0);
        assert_eq!(scene.node(group).aspect(), 1.0);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let (mut scene, root, _, _) = sample_scene();
        scene.set(root, Property::Opacity, 1.4);
        assert_eq!(scene.get(root, Property::Opacity), 1.0);
    }
}
