use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use foundation::ids::RegionId;
use foundation::math::{AffineTransform, Projection, Vec3};
use layers::DEFAULT_DEPTH;
use runtime::TapThresholds;
use scene::components::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GEO_URL: &str = "https://raw.githubusercontent.com/PublicaMundi/MappingAPI/master/data/geojson/us-states.json";
pub const DEFAULT_ROSTER: &str = "data.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive extruded map of US states")]
pub struct Args {
    /// GeoJSON boundaries: file path or http(s) URL (env: REGIONMAP_GEO)
    #[arg(long)]
    pub geo: Option<String>,

    /// Officials roster, repeatable; sources are merged in order (env: REGIONMAP_ROSTER, comma separated)
    #[arg(long = "roster")]
    pub rosters: Vec<String>,

    /// Viewer settings (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pointer event script, one JSON object per line; `-` reads stdin
    #[arg(long)]
    pub events: Option<String>,

    /// Initial viewport width in CSS pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial viewport height in CSS pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,
}

impl Args {
    pub fn geo_source(&self) -> String {
        self.geo.clone().unwrap_or_else(|| {
            env::var("REGIONMAP_GEO").unwrap_or_else(|_| DEFAULT_GEO_URL.to_string())
        })
    }

    pub fn roster_sources(&self) -> Vec<String> {
        if !self.rosters.is_empty() {
            return self.rosters.clone();
        }
        match env::var("REGIONMAP_ROSTER") {
            Ok(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => vec![DEFAULT_ROSTER.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 35.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 30.0],
        }
    }
}

impl CameraConfig {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    pub max_distance_px: f64,
    pub max_duration_ms: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        let t = TapThresholds::default();
        Self {
            max_distance_px: t.max_distance_px,
            max_duration_ms: t.max_duration_ms,
        }
    }
}

/// Viewer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub damping: f64,
    pub depth: f64,
    pub tap: TapConfig,
    pub background: u32,
    pub pixel_ratio: f64,
    /// Extra per-region transforms, applied over the built-in Alaska/Hawaii ones.
    pub projection_overrides: BTreeMap<String, AffineTransform>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            damping: scene::controls::DEFAULT_DAMPING,
            depth: DEFAULT_DEPTH,
            tap: TapConfig::default(),
            background: gpu::DEFAULT_BACKGROUND.0,
            pixel_ratio: 1.0,
            projection_overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid config {path}: {error}")]
    Json {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let payload = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        serde_json::from_str(&payload).map_err(|error| ConfigError::Json {
            path: path.to_path_buf(),
            error,
        })
    }

    pub fn projection(&self) -> Projection {
        let mut projection = Projection::us_states();
        for (region, transform) in &self.projection_overrides {
            projection.set_override(RegionId::new(region.as_str()), *transform);
        }
        projection
    }

    pub fn tap_thresholds(&self) -> TapThresholds {
        TapThresholds {
            max_distance_px: self.tap.max_distance_px,
            max_duration_ms: self.tap.max_duration_ms,
        }
    }

    pub fn background(&self) -> Rgb {
        Rgb(self.background)
    }
}
