use std::collections::HashMap;

use foundation::ids::{Affiliation, RegionId};

use crate::entity::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntry {
    pub id: RegionId,
    pub affiliation: Affiliation,
    solids: Vec<EntityId>,
}

impl RegionEntry {
    pub fn solids(&self) -> &[EntityId] {
        &self.solids
    }
}

/// Maps each region to the solids built for it.
///
/// A multi-polygon region owns one solid per polygon; all of them are
/// highlighted and selected together.
///
/// Ordering contract:
/// - `regions()` yields regions in first-registration order.
/// - `all_solids()` yields solids in registration order.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    entries: Vec<RegionEntry>,
    by_id: HashMap<RegionId, usize>,
    all: Vec<EntityId>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a region and its affiliation. Re-declaring updates the affiliation.
    pub fn declare(&mut self, region: RegionId, affiliation: Affiliation) {
        let idx = self.entry_index(region);
        self.entries[idx].affiliation = affiliation;
    }

    pub fn register(&mut self, region: RegionId, solid: EntityId) {
        let idx = self.entry_index(region);
        self.entries[idx].solids.push(solid);
        self.all.push(solid);
    }

    pub fn solids_for(&self, region: &RegionId) -> &[EntityId] {
        self.get(region).map(|e| e.solids()).unwrap_or(&[])
    }

    pub fn all_solids(&self) -> &[EntityId] {
        &self.all
    }

    pub fn get(&self, region: &RegionId) -> Option<&RegionEntry> {
        self.by_id.get(region).map(|idx| &self.entries[*idx])
    }

    pub fn affiliation(&self, region: &RegionId) -> Affiliation {
        self.get(region).map(|e| e.affiliation).unwrap_or_default()
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_index(&mut self, region: RegionId) -> usize {
        if let Some(idx) = self.by_id.get(&region) {
            return *idx;
        }
        let idx = self.entries.len();
        self.entries.push(RegionEntry {
            id: region.clone(),
            affiliation: Affiliation::Unknown,
            solids: Vec::new(),
        });
        self.by_id.insert(region, idx);
        idx
    }
}
