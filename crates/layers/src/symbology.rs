use foundation::ids::Affiliation;
use scene::components::{MeshMaterial, Rgb};

/// Fill colors per affiliation. Outlines are always the black overlay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionStyle {
    pub majority: Rgb,
    pub minority: Rgb,
    pub unknown: Rgb,
    pub shininess: f32,
}

impl RegionStyle {
    pub const fn new(majority: Rgb, minority: Rgb, unknown: Rgb) -> Self {
        Self {
            majority,
            minority,
            unknown,
            shininess: 30.0,
        }
    }

    pub fn color_for(&self, affiliation: Affiliation) -> Rgb {
        match affiliation {
            Affiliation::Majority => self.majority,
            Affiliation::Minority => self.minority,
            Affiliation::Unknown => self.unknown,
        }
    }

    pub fn solid_material(&self, affiliation: Affiliation) -> MeshMaterial {
        MeshMaterial::phong(self.color_for(affiliation), self.shininess)
    }
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self::new(Rgb(0xff2222), Rgb(0x2244ff), Rgb(0x888888))
    }
}
