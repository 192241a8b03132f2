//! Region selection and highlight.
//!
//! `Selection` is the only code that touches a solid's emissive term. Every
//! resolved tap (hit or miss) goes through `Selection::apply`, which moves
//! between `Idle` and `Selected(region)` and reports the transition so the
//! detail panel can follow.

use foundation::ids::RegionId;
use tracing::debug;

use crate::World;
use crate::components::Rgb;
use crate::entity::EntityId;
use crate::registry::RegionRegistry;

pub const HIGHLIGHT_EMISSIVE: Rgb = Rgb(0xffffff);
pub const HIGHLIGHT_INTENSITY: f32 = 0.25;

/// Set of highlighted solids, backed by a bitset over `EntityId::index()`.
///
/// Ordering contract:
/// - Iteration yields entities in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    words: Vec<u64>,
    len: usize,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        let (word, bit) = word_bit(entity.index());
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, entity: EntityId) -> bool {
        let (word, bit) = word_bit(entity.index());
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        SelectionIter {
            words: &self.words,
            word_index: 0,
            current_word: 0,
            base_index: 0,
        }
    }
}

fn word_bit(index: u32) -> (usize, u32) {
    ((index / 64) as usize, index % 64)
}

struct SelectionIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current_word: u64,
    base_index: u32,
}

impl Iterator for SelectionIter<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let tz = self.current_word.trailing_zeros();
                self.current_word &= !(1u64 << tz);
                return Some(EntityId(self.base_index + tz));
            }

            let w = *self.words.get(self.word_index)?;
            self.current_word = w;
            self.base_index = (self.word_index as u32) * 64;
            self.word_index += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(RegionId),
}

/// What `Selection::apply` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Idle -> Selected.
    Selected(RegionId),
    /// Selected(A) -> Selected(A); highlight reapplied.
    Reselected(RegionId),
    /// Selected(A) -> Selected(B).
    Switched { from: RegionId, to: RegionId },
    /// Selected(A) -> Idle.
    Cleared(RegionId),
    /// Idle -> Idle.
    Unchanged,
}

impl Transition {
    /// Forwards the transition to the panel hooks.
    pub fn notify(&self, observer: &mut impl SelectionObserver) {
        match self {
            Transition::Selected(region)
            | Transition::Reselected(region)
            | Transition::Switched { to: region, .. } => observer.on_region_selected(region),
            Transition::Cleared(_) => observer.on_selection_cleared(),
            Transition::Unchanged => {}
        }
    }
}

/// Hooks for whatever presents the selected region (the detail panel).
pub trait SelectionObserver {
    fn on_region_selected(&mut self, region: &RegionId);
    fn on_selection_cleared(&mut self);
}

#[derive(Debug, Default)]
pub struct Selection {
    state: SelectionState,
    highlighted: SelectionSet,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn current(&self) -> Option<&RegionId> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selected(region) => Some(region),
        }
    }

    /// Solids whose highlight must be restored when the selection clears.
    pub fn highlighted(&self) -> &SelectionSet {
        &self.highlighted
    }

    /// Applies the outcome of one hit test.
    pub fn apply(
        &mut self,
        hit: Option<&RegionId>,
        world: &mut World,
        registry: &RegionRegistry,
    ) -> Transition {
        let previous = std::mem::take(&mut self.state);
        if let SelectionState::Selected(_) = &previous {
            self.unhighlight(world);
        }

        let transition = match (previous, hit) {
            (SelectionState::Idle, None) => Transition::Unchanged,
            (SelectionState::Selected(from), None) => Transition::Cleared(from),
            (SelectionState::Idle, Some(to)) => Transition::Selected(to.clone()),
            (SelectionState::Selected(from), Some(to)) if from == *to => {
                Transition::Reselected(from)
            }
            (SelectionState::Selected(from), Some(to)) => Transition::Switched {
                from,
                to: to.clone(),
            },
        };

        if let Some(region) = hit {
            self.highlight(region, world, registry);
            self.state = SelectionState::Selected(region.clone());
        }

        debug!(?transition, "selection transition");
        transition
    }

    /// Explicit clear, same as a miss.
    pub fn clear(&mut self, world: &mut World, registry: &RegionRegistry) -> Transition {
        self.apply(None, world, registry)
    }

    fn highlight(&mut self, region: &RegionId, world: &mut World, registry: &RegionRegistry) {
        for solid in registry.solids_for(region) {
            if let Some(material) = world.mesh_material_mut(*solid) {
                material.set_emissive(HIGHLIGHT_EMISSIVE, HIGHLIGHT_INTENSITY);
                self.highlighted.insert(*solid);
            }
        }
    }

    fn unhighlight(&mut self, world: &mut World) {
        for solid in self.highlighted.iter() {
            if let Some(material) = world.mesh_material_mut(solid) {
                material.set_emissive(Rgb::BLACK, 0.0);
            }
        }
        self.highlighted.clear();
    }
}
