//! GeoJSON reader for region boundaries.
//!
//! Only Polygon and MultiPolygon features are kept. Anything else (points,
//! lines, null geometry, unnamed features) is logged and skipped; only a
//! structurally broken document is an error.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Closed boundary; the closing duplicate may or may not be present.
pub type Ring = Vec<GeoPoint>;

/// Outer ring first, then holes.
pub type PolygonRings = Vec<Ring>;

#[derive(Debug, Clone, PartialEq)]
pub enum RegionGeometry {
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
}

impl RegionGeometry {
    /// Each polygon becomes one solid.
    pub fn polygons(&self) -> &[PolygonRings] {
        match self {
            RegionGeometry::Polygon(rings) => std::slice::from_ref(rings),
            RegionGeometry::MultiPolygon(polys) => polys,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    /// `properties.name`; joins against the roster.
    pub name: String,
    pub properties: Map<String, Value>,
    pub geometry: RegionGeometry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFeatures {
    pub features: Vec<RegionFeature>,
    /// Features dropped for unsupported geometry or a missing name.
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("GeoJSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl RegionFeatures {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut out = RegionFeatures::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| GeoJsonError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let properties = feat_obj
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            let Some(name) = properties.get("name").and_then(Value::as_str) else {
                warn!(index, "feature without properties.name skipped");
                out.skipped += 1;
                continue;
            };
            let name = name.to_string();

            let geometry = match feat_obj.get("geometry") {
                Some(Value::Null) | None => {
                    warn!(index, region = %name, "feature without geometry skipped");
                    out.skipped += 1;
                    continue;
                }
                Some(geometry_val) => parse_geometry(geometry_val)
                    .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?,
            };
            let Some(geometry) = geometry else {
                out.skipped += 1;
                continue;
            };

            out.features.push(RegionFeature {
                name,
                properties,
                geometry,
            });
        }
        Ok(out)
    }
}

/// `Ok(None)` for well-formed geometry of an unsupported kind.
fn parse_geometry(value: &Value) -> Result<Option<RegionGeometry>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry missing type".to_string())?;

    match ty {
        "Polygon" | "MultiPolygon" => {}
        other => {
            warn!(geometry = other, "unsupported geometry type skipped");
            return Ok(None);
        }
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;
    if ty == "Polygon" {
        Ok(Some(RegionGeometry::Polygon(parse_polygon(coords)?)))
    } else {
        Ok(Some(RegionGeometry::MultiPolygon(parse_multi_polygon(
            coords,
        )?)))
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_polygon(coords: &Value) -> Result<PolygonRings, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<PolygonRings>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}
