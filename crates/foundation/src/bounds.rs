use crate::math::Vec3;

/// Axis-aligned bounding box in scene space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Tight bounds around `points`; `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Aabb3::new([first.x, first.y, first.z], [first.x, first.y, first.z]);
        for p in &points[1..] {
            b.expand([p.x, p.y, p.z]);
        }
        Some(b)
    }

    pub fn expand(&mut self, p: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        let mut out = *self;
        out.expand(other.min);
        out.expand(other.max);
        out
    }

    /// Grows the box by `pad` on every side.
    pub fn inflated(&self, pad: f64) -> Aabb3 {
        Aabb3::new(
            [self.min[0] - pad, self.min[1] - pad, self.min[2] - pad],
            [self.max[0] + pad, self.max[1] + pad, self.max[2] + pad],
        )
    }

    pub fn centroid_axis(&self, axis: usize) -> f64 {
        (self.min[axis] + self.max[axis]) * 0.5
    }

    /// Slab test; returns the entry distance clamped to `t_min`.
    pub fn ray_entry(&self, origin: [f64; 3], dir: [f64; 3], mut t_min: f64, mut t_max: f64) -> Option<f64> {
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let min = self.min[axis];
            let max = self.max[axis];

            if d.abs() < 1e-12 {
                if o < min || o > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t1 = (min - o) * inv;
            let mut t2 = (max - o) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }
}
