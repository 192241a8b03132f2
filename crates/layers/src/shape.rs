//! Polygon rings to planar shapes.

use foundation::ids::RegionId;
use foundation::math::{Projection, Vec2};
use formats::geojson::Ring;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
}

impl PathCommand {
    pub fn point(self) -> Vec2 {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
        }
    }
}

/// A single boundary drawn as move/line commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Vec2) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every vertex in drawing order, including the closing point.
    pub fn points(&self) -> Vec<Vec2> {
        self.commands.iter().map(|c| c.point()).collect()
    }

    /// Vertices with the closing point removed.
    pub fn ring(&self) -> Vec<Vec2> {
        let mut pts = self.points();
        if self.is_closed() {
            pts.pop();
        }
        pts
    }

    pub fn is_closed(&self) -> bool {
        match (self.commands.first(), self.commands.last()) {
            (Some(first), Some(last)) if self.commands.len() >= 2 => first.point() == last.point(),
            _ => false,
        }
    }

    /// Shoelace area; positive for counter-clockwise boundaries.
    pub fn signed_area(&self) -> f64 {
        let pts = self.points();
        if pts.len() < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for w in pts.windows(2) {
            sum += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        0.5 * sum
    }
}

/// Filled planar outline with optional holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape2D {
    pub outer: Path,
    pub holes: Vec<Path>,
}

/// Builds the planar shape of one polygon of `region`.
///
/// Ring 0 is the outer boundary; later rings become holes. Every non-empty
/// ring is closed with an explicit segment back to its first point, and the
/// projected `y` is negated (screen-style north-up to scene `y` up).
pub fn build_shape(rings: &[Ring], region: &RegionId, projection: &Projection) -> Shape2D {
    let mut shape = Shape2D::default();
    for (i, ring) in rings.iter().enumerate() {
        let path = ring_path(ring, region, projection);
        if i == 0 {
            shape.outer = path;
        } else {
            shape.holes.push(path);
        }
    }
    shape
}

fn ring_path(ring: &Ring, region: &RegionId, projection: &Projection) -> Path {
    let mut path = Path::new();
    let mut first = None;
    for p in ring {
        let xy = projection.project(p.lon_deg, p.lat_deg, region);
        let xy = Vec2::new(xy.x, -xy.y);
        match first {
            None => {
                path.move_to(xy);
                first = Some(xy);
            }
            Some(_) => path.line_to(xy),
        }
    }
    if let Some(start) = first {
        path.line_to(start);
    }
    path
}
