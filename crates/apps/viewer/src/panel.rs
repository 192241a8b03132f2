use std::fmt;

use foundation::ids::RegionId;
use formats::roster::{Official, Roster};
use scene::selection::SelectionObserver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficialCard {
    pub name: String,
    pub role: String,
    pub party: String,
    pub image: String,
    pub religion: String,
}

impl From<&Official> for OfficialCard {
    fn from(o: &Official) -> Self {
        Self {
            name: o.name.clone(),
            role: o.role.clone(),
            party: o.party.clone(),
            image: o.image_or_placeholder().to_string(),
            religion: o.religion_or_placeholder().to_string(),
        }
    }
}

/// What the panel shows for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub title: String,
    pub officials: Vec<OfficialCard>,
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for o in &self.officials {
            writeln!(f, "  {} ({} • {})", o.name, o.role, o.party)?;
            writeln!(f, "    image: {}", o.image)?;
            writeln!(f, "    Religion: {}", o.religion)?;
        }
        Ok(())
    }
}

/// Region details shown next to the map; hidden while nothing is selected.
#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    roster: Roster,
    view: Option<PanelView>,
    updates: u64,
}

impl DetailPanel {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            view: None,
            updates: 0,
        }
    }

    pub fn view(&self) -> Option<&PanelView> {
        self.view.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.view.is_some()
    }

    /// Number of times the panel was repopulated or hidden.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl SelectionObserver for DetailPanel {
    fn on_region_selected(&mut self, region: &RegionId) {
        let officials = self
            .roster
            .get(region)
            .map(|r| r.officials.iter().map(OfficialCard::from).collect())
            .unwrap_or_default();
        self.view = Some(PanelView {
            title: region.to_string(),
            officials,
        });
        self.updates += 1;
    }

    fn on_selection_cleared(&mut self) {
        self.view = None;
        self.updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::DetailPanel;
    use foundation::ids::RegionId;
    use formats::roster::Roster;
    use scene::selection::SelectionObserver;

    fn roster() -> Roster {
        Roster::from_json_str(
            r#"{ "states": { "Utah": { "party": "Republican", "officials": [
                { "name": "Gov U", "position": "Governor", "party": "Republican" },
                { "name": "Sen U", "position": "Senator", "party": "Republican",
                  "image": "https://example.org/u.png", "religion": "LDS" } ] } } }"#,
        )
        .expect("roster")
    }

    #[test]
    fn populates_with_fallbacks_and_hides() {
        let mut panel = DetailPanel::new(roster());
        assert!(!panel.is_visible());

        panel.on_region_selected(&RegionId::from("Utah"));
        let view = panel.view().expect("visible");
        assert_eq!(view.title, "Utah");
        assert_eq!(view.officials.len(), 2);
        assert_eq!(view.officials[0].image, "https://via.placeholder.com/60");
        assert_eq!(view.officials[0].religion, "—");
        assert_eq!(view.officials[1].religion, "LDS");
        let text = view.to_string();
        assert!(text.starts_with("Utah\n"));
        assert!(text.contains("Gov U (Governor • Republican)"));

        panel.on_selection_cleared();
        assert!(!panel.is_visible());
        assert_eq!(panel.updates(), 2);
    }

    #[test]
    fn region_without_officials_shows_title_only() {
        let mut panel = DetailPanel::new(roster());
        panel.on_region_selected(&RegionId::from("Nevada"));
        let view = panel.view().expect("visible");
        assert!(view.officials.is_empty());
        assert_eq!(view.to_string(), "Nevada\n");
    }
}
