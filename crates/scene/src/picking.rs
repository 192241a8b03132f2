use foundation::ids::RegionId;
use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::camera::{PerspectiveCamera, Viewport};
use crate::components::{EdgeSegments, HasRegionId, Mesh};
use crate::entity::EntityId;
use crate::registry::RegionRegistry;
use crate::spatial::{Bvh, Item as BvhItem};
use crate::world::NodeGeometry;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

/// One ray/object intersection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// Distance within which a ray counts as touching a line segment.
    pub line_threshold: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            line_threshold: 0.5,
        }
    }
}

/// Intersects `ray` with `roots` and all of their descendants.
///
/// Decorative nodes are visited (their children still count) but never
/// produce intersections.
///
/// Ordering contract:
/// - Results are sorted nearest first.
/// - Equal distances are ordered by ascending `EntityId::index()`.
pub fn intersect_objects(
    world: &World,
    roots: &[EntityId],
    ray: Ray,
    opts: PickOptions,
) -> Vec<Intersection> {
    let Some(dir) = ray.dir.normalized() else {
        return Vec::new();
    };
    let ray = Ray::new(ray.origin, dir);

    // Inflate the broad phase so lines just outside a box can still be touched.
    let pad = opts.line_threshold.max(0.0);
    let items: Vec<BvhItem> = roots
        .iter()
        .filter_map(|e| {
            world.subtree_bounds(*e).map(|bounds| BvhItem {
                entity: *e,
                bounds: bounds.inflated(pad),
            })
        })
        .collect();
    let bvh = Bvh::build(items);
    let candidates = bvh.query_ray(
        ray.origin.to_array(),
        ray.dir.to_array(),
        0.0,
        opts.max_distance,
    );

    let mut hits = Vec::new();
    for root in candidates {
        intersect_recursive(world, root, ray, opts, &mut hits);
    }

    hits.sort_by(|a, b| {
        stable_total_cmp_f64(a.distance, b.distance)
            .then_with(|| a.entity.index().cmp(&b.entity.index()))
    });
    hits
}

fn intersect_recursive(
    world: &World,
    entity: EntityId,
    ray: Ray,
    opts: PickOptions,
    out: &mut Vec<Intersection>,
) {
    let Some(node) = world.node(entity) else {
        return;
    };

    if node.interaction.is_interactive() {
        let t = match &node.geometry {
            NodeGeometry::Mesh { mesh, .. } => ray_mesh_t(ray, mesh, opts.max_distance),
            NodeGeometry::Lines { edges, .. } => {
                ray_edges_t(ray, edges, opts.line_threshold, opts.max_distance)
            }
        };
        if let Some(t) = t {
            out.push(Intersection {
                entity,
                distance: t,
                point: ray.at(t),
            });
        }
    }

    for child in node.children() {
        intersect_recursive(world, *child, ray, opts, out);
    }
}

/// Nearest triangle hit (Möller–Trumbore, double sided).
fn ray_mesh_t(ray: Ray, mesh: &Mesh, max_distance: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for i in 0..mesh.triangle_count() {
        let Some([a, b, c]) = mesh.triangle(i) else {
            continue;
        };
        if let Some(t) = ray_triangle_t(ray, a, b, c)
            && t <= max_distance
            && best.is_none_or(|bt| t < bt)
        {
            best = Some(t);
        }
    }
    best
}

fn ray_triangle_t(ray: Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f64> {
    const EPS: f64 = 1e-12;
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}

/// Nearest segment within `threshold` of the ray, measured at closest approach.
fn ray_edges_t(ray: Ray, edges: &EdgeSegments, threshold: f64, max_distance: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for [a, b] in &edges.segments {
        let Some((t, dist)) = ray_segment_closest(ray, *a, *b) else {
            continue;
        };
        if dist <= threshold && t <= max_distance && best.is_none_or(|bt| t < bt) {
            best = Some(t);
        }
    }
    best
}

/// Ray parameter and distance at the closest approach between ray and segment.
fn ray_segment_closest(ray: Ray, a: Vec3, b: Vec3) -> Option<(f64, f64)> {
    let seg = b - a;
    let w0 = ray.origin - a;
    let aa = ray.dir.dot(ray.dir);
    let bb = ray.dir.dot(seg);
    let cc = seg.dot(seg);
    let dd = ray.dir.dot(w0);
    let ee = seg.dot(w0);
    let denom = aa * cc - bb * bb;

    let s = if cc <= 0.0 {
        0.0
    } else if denom.abs() < 1e-12 {
        (ee / cc).clamp(0.0, 1.0)
    } else {
        ((aa * ee - bb * dd) / denom).clamp(0.0, 1.0)
    };
    let on_seg = a + seg.scale(s);
    let t = (on_seg - ray.origin).dot(ray.dir) / aa;
    if t < 0.0 {
        return None;
    }
    let dist = (ray.at(t) - on_seg).length();
    Some((t, dist))
}

/// Region tag of `entity`, falling back to its immediate parent.
fn owning_region(world: &World, entity: EntityId) -> Option<&RegionId> {
    let node = world.node(entity)?;
    if let Some(region) = node.region_id() {
        return Some(region);
    }
    world.node(node.parent()?)?.region_id()
}

/// First region along `ray` among all registered solids.
pub fn resolve_ray(
    world: &World,
    registry: &RegionRegistry,
    ray: Ray,
    opts: PickOptions,
) -> Option<RegionId> {
    intersect_objects(world, registry.all_solids(), ray, opts)
        .into_iter()
        .find_map(|hit| owning_region(world, hit.entity).cloned())
}

/// Maps a pointer position (page pixels) to the topmost region under it.
pub fn resolve(
    screen_x: f64,
    screen_y: f64,
    viewport: &Viewport,
    camera: &PerspectiveCamera,
    world: &World,
    registry: &RegionRegistry,
) -> Option<RegionId> {
    let ndc = viewport.to_ndc(screen_x, screen_y)?;
    let ray = camera.ray_through_ndc(ndc)?;
    resolve_ray(world, registry, ray, PickOptions::default())
}
