//! Planar shapes to prisms.
//!
//! Caps are triangulated with earcut. The back cap sits at `z = 0`, the front
//! cap at `z = depth`, and walls join every boundary edge. No bevel.

use earcutr::earcut;
use foundation::math::{Vec2, Vec3};
use scene::components::{EdgeSegments, Mesh, SolidGeometry};

use crate::shape::{Path, Shape2D};

/// Vertical outline edges appear where the boundary turns by more than this.
pub const OUTLINE_THRESHOLD_DEG: f64 = 1.0;

/// Extrudes `shape` along +z.
///
/// Degenerate shapes (fewer than three distinct outer points) yield an empty
/// solid. Holes with fewer than three points are ignored.
pub fn extrude(shape: &Shape2D, depth: f64) -> SolidGeometry {
    let outer = cap_ring(&shape.outer);
    if outer.len() < 3 {
        return SolidGeometry {
            depth,
            ..SolidGeometry::default()
        };
    }

    let mut rings = vec![outer];
    rings.extend(
        shape
            .holes
            .iter()
            .map(cap_ring)
            .filter(|ring| ring.len() >= 3),
    );

    let mut coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();
    let mut flat: Vec<Vec2> = Vec::new();
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            hole_indices.push(flat.len());
        }
        for p in ring {
            coords.push(p.x);
            coords.push(p.y);
            flat.push(*p);
        }
    }

    let n = flat.len();
    let mut mesh = Mesh {
        positions: Vec::with_capacity(2 * n),
        triangles: Vec::new(),
    };
    mesh.positions
        .extend(flat.iter().map(|p| Vec3::new(p.x, p.y, 0.0)));
    mesh.positions
        .extend(flat.iter().map(|p| Vec3::new(p.x, p.y, depth)));

    let bottom = |i: usize| i as u32;
    let top = |i: usize| (n + i) as u32;

    // Triangulation failure leaves the walls without caps.
    let cap = earcut(&coords, &hole_indices, 2).unwrap_or_default();
    for tri in cap.chunks_exact(3) {
        mesh.triangles.push([top(tri[0]), top(tri[1]), top(tri[2])]);
        mesh.triangles
            .push([bottom(tri[2]), bottom(tri[1]), bottom(tri[0])]);
    }

    let mut outline = EdgeSegments::default();
    let mut start = 0;
    for ring in &rings {
        let len = ring.len();
        for k in 0..len {
            let i = start + k;
            let j = start + (k + 1) % len;
            mesh.triangles.push([bottom(i), bottom(j), top(j)]);
            mesh.triangles.push([bottom(i), top(j), top(i)]);

            outline
                .segments
                .push([mesh.positions[bottom(i) as usize], mesh.positions[bottom(j) as usize]]);
            outline
                .segments
                .push([mesh.positions[top(i) as usize], mesh.positions[top(j) as usize]]);

            let prev = ring[(k + len - 1) % len];
            if turn_deg(prev, ring[k], ring[(k + 1) % len]) > OUTLINE_THRESHOLD_DEG {
                outline
                    .segments
                    .push([mesh.positions[bottom(i) as usize], mesh.positions[top(i) as usize]]);
            }
        }
        start += len;
    }

    SolidGeometry {
        mesh,
        outline,
        depth,
    }
}

/// Path vertices without the closing segment or any closing duplicate.
fn cap_ring(path: &Path) -> Vec<Vec2> {
    let mut points = path.ring();
    while points.len() >= 2 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first.x - last.x).abs() < 1e-9 && (first.y - last.y).abs() < 1e-9 {
            points.pop();
        } else {
            break;
        }
    }
    points
}

/// Direction change at `b`, in degrees. Zero-length edges count as straight.
fn turn_deg(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let u = b - a;
    let v = c - b;
    let lu = (u.x * u.x + u.y * u.y).sqrt();
    let lv = (v.x * v.x + v.y * v.y).sqrt();
    if lu == 0.0 || lv == 0.0 {
        return 0.0;
    }
    let cos = ((u.x * v.x + u.y * v.y) / (lu * lv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::extrude;
    use crate::shape::{Path, Shape2D};
    use foundation::math::{Vec2, Vec3};
    use scene::components::Mesh;

    fn path(points: &[(f64, f64)]) -> Path {
        let mut p = Path::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                p.move_to(Vec2::new(x, y));
            } else {
                p.line_to(Vec2::new(x, y));
            }
        }
        if let Some(&(x, y)) = points.first() {
            p.line_to(Vec2::new(x, y));
        }
        p
    }

    fn cap_area(mesh: &Mesh, z: f64) -> f64 {
        (0..mesh.triangle_count())
            .filter_map(|i| mesh.triangle(i))
            .filter(|t| t.iter().all(|p| p.z == z))
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum()
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn square_prism_counts() {
        let shape = Shape2D {
            outer: path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            holes: Vec::new(),
        };
        let solid = extrude(&shape, 0.2);
        assert_eq!(solid.mesh.positions.len(), 8);
        // Two triangles per cap, two per wall.
        assert_eq!(solid.mesh.triangle_count(), 2 + 2 + 4 * 2);
        // Four edges per cap plus four corners.
        assert_eq!(solid.outline.len(), 12);
        let b = solid.mesh.bounds().expect("bounds");
        assert_eq!(b.min, [0.0, 0.0, 0.0]);
        assert_eq!(b.max, [1.0, 1.0, 0.2]);
        assert_close(cap_area(&solid.mesh, 0.2), 1.0, 1e-12);
    }

    #[test]
    fn holes_are_cut_through() {
        let shape = Shape2D {
            outer: path(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            holes: vec![path(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)])],
        };
        let solid = extrude(&shape, 0.5);
        assert_close(cap_area(&solid.mesh, 0.5), 15.0, 1e-9);
        assert_close(cap_area(&solid.mesh, 0.0), 15.0, 1e-9);
        assert_eq!(solid.outline.len(), 2 * 12);
    }

    #[test]
    fn closing_duplicate_in_input_is_dropped() {
        let shape = Shape2D {
            outer: path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            holes: Vec::new(),
        };
        let solid = extrude(&shape, 1.0);
        assert_eq!(solid.mesh.positions.len(), 6);
    }

    #[test]
    fn collinear_vertices_get_no_vertical_edge() {
        let shape = Shape2D {
            outer: path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]),
            holes: Vec::new(),
        };
        let solid = extrude(&shape, 1.0);
        let vertical = solid
            .outline
            .segments
            .iter()
            .filter(|[a, b]| a.z != b.z)
            .count();
        assert_eq!(vertical, 4);
        assert!(
            !solid
                .outline
                .segments
                .contains(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)])
        );
    }

    #[test]
    fn degenerate_shapes_yield_empty_solids() {
        let point = Shape2D {
            outer: path(&[(3.0, 4.0)]),
            holes: Vec::new(),
        };
        let solid = extrude(&point, 0.2);
        assert_eq!(solid.mesh.triangle_count(), 0);
        assert!(solid.outline.is_empty());
        assert_eq!(solid.depth, 0.2);

        let empty = extrude(&Shape2D::default(), 0.2);
        assert!(empty.mesh.positions.is_empty());
    }

    #[test]
    fn tiny_holes_are_ignored() {
        let shape = Shape2D {
            outer: path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            holes: vec![path(&[(0.2, 0.1)]), Path::new()],
        };
        let solid = extrude(&shape, 0.2);
        assert_eq!(solid.mesh.positions.len(), 6);
        assert_close(cap_area(&solid.mesh, 0.2), 0.5, 1e-12);
    }
}
