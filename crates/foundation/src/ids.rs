use std::fmt;

/// Identifier of one region (a US state), keyed by its display name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(name: impl Into<String>) -> Self {
        RegionId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(name: &str) -> Self {
        RegionId::new(name)
    }
}

/// Political affiliation category driving a region's display color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Affiliation {
    Majority,
    Minority,
    #[default]
    Unknown,
}

impl Affiliation {
    /// Maps a party label from the officials dataset onto a category.
    pub fn from_party(party: &str) -> Self {
        match party {
            "Republican" => Affiliation::Majority,
            "Democrat" => Affiliation::Minority,
            _ => Affiliation::Unknown,
        }
    }
}
