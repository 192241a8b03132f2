use foundation::bounds::Aabb3;
use foundation::ids::RegionId;

use crate::components::{
    EdgeSegments, HasRegionId, Interaction, LineMaterial, Mesh, MeshMaterial, SolidGeometry,
};
use crate::entity::EntityId;

/// Outlines draw after everything else.
pub const OUTLINE_RENDER_ORDER: i32 = 999;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeGeometry {
    Mesh { mesh: Mesh, material: MeshMaterial },
    Lines { edges: EdgeSegments, material: LineMaterial },
}

impl NodeGeometry {
    pub fn bounds(&self) -> Option<Aabb3> {
        match self {
            NodeGeometry::Mesh { mesh, .. } => mesh.bounds(),
            NodeGeometry::Lines { edges, .. } => edges.bounds(),
        }
    }
}

/// One object in the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub geometry: NodeGeometry,
    pub interaction: Interaction,
    pub render_order: i32,
    region: Option<RegionId>,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    bounds: Option<Aabb3>,
}

impl Node {
    pub fn new(geometry: NodeGeometry, interaction: Interaction) -> Self {
        let bounds = geometry.bounds();
        Self {
            geometry,
            interaction,
            render_order: 0,
            region: None,
            parent: None,
            children: Vec::new(),
            bounds,
        }
    }

    pub fn with_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn bounds(&self) -> Option<Aabb3> {
        self.bounds
    }
}

impl HasRegionId for Node {
    fn region_id(&self) -> Option<&RegionId> {
        self.region.as_ref()
    }
}

/// Scene graph of region solids and their overlays.
#[derive(Debug, Default)]
pub struct World {
    nodes: Vec<Option<Node>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, node: Node) -> EntityId {
        let id = EntityId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Spawns `node` under `parent`. Returns `None` if the parent is gone.
    pub fn spawn_child(&mut self, parent: EntityId, node: Node) -> Option<EntityId> {
        self.node(parent)?;
        Some(self.attach_child(parent, node))
    }

    /// `parent` must be live.
    fn attach_child(&mut self, parent: EntityId, mut node: Node) -> EntityId {
        node.parent = Some(parent);
        let child = self.spawn(node);
        let p = self.node_mut(parent);
        debug_assert!(p.is_some(), "parent {parent:?} is not live");
        if let Some(p) = p {
            p.children.push(child);
        }
        child
    }

    /// Spawns an interactive region solid with its decorative outline child.
    pub fn spawn_solid(
        &mut self,
        region: RegionId,
        solid: SolidGeometry,
        material: MeshMaterial,
    ) -> EntityId {
        let SolidGeometry { mesh, outline, .. } = solid;
        let entity = self.spawn(
            Node::new(NodeGeometry::Mesh { mesh, material }, Interaction::Interactive)
                .with_region(region),
        );
        let outline = Node::new(
            NodeGeometry::Lines {
                edges: outline,
                material: LineMaterial::overlay(),
            },
            Interaction::Decorative,
        )
        .with_render_order(OUTLINE_RENDER_ORDER);
        self.attach_child(entity, outline);
        entity
    }

    pub fn node(&self, entity: EntityId) -> Option<&Node> {
        self.nodes.get(entity.index() as usize).and_then(|n| n.as_ref())
    }

    fn node_mut(&mut self, entity: EntityId) -> Option<&mut Node> {
        self.nodes
            .get_mut(entity.index() as usize)
            .and_then(|n| n.as_mut())
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.node(entity).is_some()
    }

    pub fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.node(entity).and_then(|n| n.parent)
    }

    pub fn children(&self, entity: EntityId) -> &[EntityId] {
        self.node(entity).map(|n| n.children()).unwrap_or(&[])
    }

    /// Bounds of `entity` and all of its descendants.
    pub fn subtree_bounds(&self, entity: EntityId) -> Option<Aabb3> {
        let node = self.node(entity)?;
        let mut out = node.bounds;
        for child in &node.children {
            if let Some(cb) = self.subtree_bounds(*child) {
                out = Some(match out {
                    Some(b) => b.union(&cb),
                    None => cb,
                });
            }
        }
        out
    }

    pub fn mesh_material(&self, entity: EntityId) -> Option<&MeshMaterial> {
        match &self.node(entity)?.geometry {
            NodeGeometry::Mesh { material, .. } => Some(material),
            NodeGeometry::Lines { .. } => None,
        }
    }

    pub(crate) fn mesh_material_mut(&mut self, entity: EntityId) -> Option<&mut MeshMaterial> {
        match &mut self.node_mut(entity)?.geometry {
            NodeGeometry::Mesh { material, .. } => Some(material),
            NodeGeometry::Lines { .. } => None,
        }
    }

    /// Removes `entity` and its descendants. Returns how many nodes were removed.
    pub fn despawn(&mut self, entity: EntityId) -> usize {
        let Some(node) = self
            .nodes
            .get_mut(entity.index() as usize)
            .and_then(|n| n.take())
        else {
            return 0;
        };

        if let Some(parent) = node.parent
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != entity);
        }

        let mut removed = 1;
        for child in node.children {
            removed += self.despawn(child);
        }
        removed
    }

    /// Live nodes in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, n)| n.as_ref().map(|n| (EntityId(idx as u32), n)))
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeGeometry, OUTLINE_RENDER_ORDER, World};
    use crate::components::{
        EdgeSegments, HasRegionId, Interaction, Mesh, MeshMaterial, Rgb, SolidGeometry,
    };
    use foundation::ids::RegionId;
    use foundation::math::Vec3;

    fn tiny_solid() -> SolidGeometry {
        SolidGeometry {
            mesh: Mesh {
                positions: vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
                triangles: vec![[0, 1, 2]],
            },
            outline: EdgeSegments {
                segments: vec![[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]],
            },
            depth: 0.0,
        }
    }

    #[test]
    fn solid_owns_decorative_outline() {
        let mut world = World::new();
        let solid = world.spawn_solid(
            RegionId::from("Utah"),
            tiny_solid(),
            MeshMaterial::phong(Rgb(0xff2222), 30.0),
        );

        let node = world.node(solid).expect("solid");
        assert_eq!(node.region_id(), Some(&RegionId::from("Utah")));
        assert_eq!(node.interaction, Interaction::Interactive);

        let [outline] = world.children(solid) else {
            panic!("expected one outline child");
        };
        let outline_node = world.node(*outline).expect("outline");
        assert_eq!(outline_node.interaction, Interaction::Decorative);
        assert_eq!(outline_node.render_order, OUTLINE_RENDER_ORDER);
        assert!(outline_node.region_id().is_none());
        assert_eq!(world.parent(*outline), Some(solid));
        match &outline_node.geometry {
            NodeGeometry::Lines { material, .. } => assert!(!material.depth_test),
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn despawn_removes_outline_too() {
        let mut world = World::new();
        let solid = world.spawn_solid(
            RegionId::from("Utah"),
            tiny_solid(),
            MeshMaterial::phong(Rgb(0xff2222), 30.0),
        );
        let outline = world.children(solid)[0];
        assert_eq!(world.len(), 2);

        assert_eq!(world.despawn(solid), 2);
        assert!(!world.contains(outline));
        assert!(world.is_empty());
        assert_eq!(world.despawn(solid), 0);
    }

    #[test]
    fn child_of_despawned_parent_is_rejected() {
        let mut world = World::new();
        let solid = world.spawn_solid(
            RegionId::from("Utah"),
            tiny_solid(),
            MeshMaterial::phong(Rgb(0xff2222), 30.0),
        );
        world.despawn(solid);
        let extra = Node::new(
            NodeGeometry::Mesh {
                mesh: tiny_solid().mesh,
                material: MeshMaterial::phong(Rgb::WHITE, 0.0),
            },
            Interaction::Interactive,
        );
        assert_eq!(world.spawn_child(solid, extra), None);
        assert!(world.is_empty());
    }

    #[test]
    fn subtree_bounds_cover_children() {
        let mut world = World::new();
        let mut solid = tiny_solid();
        solid.outline.segments.push([Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 3.0)]);
        let e = world.spawn_solid(
            RegionId::from("Utah"),
            solid,
            MeshMaterial::phong(Rgb(0xff2222), 30.0),
        );
        let b = world.subtree_bounds(e).expect("bounds");
        assert_eq!(b.max, [1.0, 1.0, 3.0]);
    }
}
