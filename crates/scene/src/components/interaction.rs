use foundation::ids::RegionId;

/// Whether a scene node takes part in hit-testing.
///
/// Outlines are `Decorative`: they are drawn but the hit resolver never
/// reports them, even when they sit in front of their solid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Interactive,
    Decorative,
}

impl Interaction {
    pub fn is_interactive(self) -> bool {
        self == Interaction::Interactive
    }
}

/// Capability of scene objects that belong to a region.
pub trait HasRegionId {
    fn region_id(&self) -> Option<&RegionId>;
}
