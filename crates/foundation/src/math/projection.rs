//! Geographic (lon, lat) to map-plane projection.
//!
//! Contiguous regions share one linear transform. Outlying regions that would
//! otherwise fall outside the frame (Alaska, Hawaii) get their own affine
//! constants through a lookup table keyed by region id.

use std::collections::HashMap;

use crate::ids::RegionId;

use super::Vec2;

/// `x = (lon + lon_offset) * lon_scale + x_offset`,
/// `y = (lat + lat_offset) * lat_scale + y_offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineTransform {
    pub lon_offset: f64,
    pub lon_scale: f64,
    pub x_offset: f64,
    pub lat_offset: f64,
    pub lat_scale: f64,
    pub y_offset: f64,
}

impl AffineTransform {
    pub const fn new(
        lon_offset: f64,
        lon_scale: f64,
        x_offset: f64,
        lat_offset: f64,
        lat_scale: f64,
        y_offset: f64,
    ) -> Self {
        Self {
            lon_offset,
            lon_scale,
            x_offset,
            lat_offset,
            lat_scale,
            y_offset,
        }
    }

    /// Passes coordinates through untouched.
    pub const IDENTITY: AffineTransform = AffineTransform::new(0.0, 1.0, 0.0, 0.0, 1.0, 0.0);

    #[inline]
    pub fn apply(&self, lon: f64, lat: f64) -> Vec2 {
        Vec2::new(
            (lon + self.lon_offset) * self.lon_scale + self.x_offset,
            (lat + self.lat_offset) * self.lat_scale + self.y_offset,
        )
    }
}

/// `x = (lon + 97) * 0.16`, `y = (49 - lat) * 0.25`.
pub const CONTIGUOUS_TRANSFORM: AffineTransform =
    AffineTransform::new(97.0, 0.16, 0.0, -49.0, -0.25, 0.0);

/// `x = (lon + 140) * 0.1 - 8`, `y = (0 - lat) * 0.2 + 12`.
pub const ALASKA_TRANSFORM: AffineTransform =
    AffineTransform::new(140.0, 0.1, -8.0, 0.0, -0.2, 12.0);

/// `x = (lon + 130) * 0.5 + 5`, `y = (lat - 25) * 1.2 + 8`.
pub const HAWAII_TRANSFORM: AffineTransform =
    AffineTransform::new(130.0, 0.5, 5.0, -25.0, 1.2, 8.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    default: AffineTransform,
    overrides: HashMap<RegionId, AffineTransform>,
}

impl Default for Projection {
    fn default() -> Self {
        Self::us_states()
    }
}

impl Projection {
    /// A projection with no per-region overrides.
    pub fn uniform(default: AffineTransform) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// The contiguous-US transform with Alaska and Hawaii repositioned.
    pub fn us_states() -> Self {
        Self::uniform(CONTIGUOUS_TRANSFORM)
            .with_override(RegionId::from("Alaska"), ALASKA_TRANSFORM)
            .with_override(RegionId::from("Hawaii"), HAWAII_TRANSFORM)
    }

    pub fn with_override(mut self, region: RegionId, transform: AffineTransform) -> Self {
        self.set_override(region, transform);
        self
    }

    pub fn set_override(&mut self, region: RegionId, transform: AffineTransform) {
        self.overrides.insert(region, transform);
    }

    pub fn transform_for(&self, region: &RegionId) -> &AffineTransform {
        self.overrides.get(region).unwrap_or(&self.default)
    }

    /// Plane coordinates before the renderer's vertical flip.
    pub fn project(&self, lon: f64, lat: f64, region: &RegionId) -> Vec2 {
        self.transform_for(region).apply(lon, lat)
    }
}
