use foundation::bounds::Aabb3;
use foundation::math::Vec3;

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn triangle(&self, i: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.triangles.get(i)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.positions)
    }
}

/// Unconnected line segments (a wireframe overlay).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSegments {
    pub segments: Vec<[Vec3; 2]>,
}

impl EdgeSegments {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb3> {
        let points: Vec<Vec3> = self.segments.iter().flatten().copied().collect();
        Aabb3::from_points(&points)
    }
}

/// Output of extrusion: the prism and the outline derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidGeometry {
    pub mesh: Mesh,
    pub outline: EdgeSegments,
    pub depth: f64,
}
