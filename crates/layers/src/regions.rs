//! Region ingest: boundaries + roster -> solids in the world and registry.

use foundation::ids::RegionId;
use foundation::math::Projection;
use formats::geojson::RegionFeatures;
use formats::roster::Roster;
use scene::World;
use scene::registry::RegionRegistry;
use tracing::{info, warn};

use crate::extrude::extrude;
use crate::shape::build_shape;
use crate::symbology::RegionStyle;

pub const DEFAULT_DEPTH: f64 = 0.2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionLayerReport {
    pub regions: usize,
    pub solids: usize,
    /// Feature names with no roster entry, in feature order.
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RegionLayer {
    pub projection: Projection,
    pub style: RegionStyle,
    pub depth: f64,
}

impl Default for RegionLayer {
    fn default() -> Self {
        Self {
            projection: Projection::us_states(),
            style: RegionStyle::default(),
            depth: DEFAULT_DEPTH,
        }
    }
}

impl RegionLayer {
    pub fn new(projection: Projection, style: RegionStyle, depth: f64) -> Self {
        Self {
            projection,
            style,
            depth,
        }
    }

    /// Spawns one solid per polygon of every feature that has a roster entry.
    ///
    /// Features without a roster entry are reported and skipped.
    pub fn build(
        &self,
        features: &RegionFeatures,
        roster: &Roster,
        world: &mut World,
        registry: &mut RegionRegistry,
    ) -> RegionLayerReport {
        let mut report = RegionLayerReport::default();
        for feature in &features.features {
            let region = RegionId::new(feature.name.as_str());
            let Some(record) = roster.get(&region) else {
                warn!(region = %region, "no roster entry for region; skipped");
                report.unmatched.push(feature.name.clone());
                continue;
            };

            let affiliation = record.affiliation();
            if registry.get(&region).is_none() {
                report.regions += 1;
            }
            registry.declare(region.clone(), affiliation);
            let material = self.style.solid_material(affiliation);
            for rings in feature.geometry.polygons() {
                let shape = build_shape(rings, &region, &self.projection);
                let solid = extrude(&shape, self.depth);
                let entity = world.spawn_solid(region.clone(), solid, material);
                registry.register(region.clone(), entity);
                report.solids += 1;
            }
        }
        info!(
            regions = report.regions,
            solids = report.solids,
            unmatched = report.unmatched.len(),
            "region layer built"
        );
        report
    }
}
