//! Officials roster: region name -> party and list of officials.
//!
//! ```json
//! { "states": { "Ohio": { "party": "Republican",
//!     "officials": [ { "name": "...", "position": "Governor", "party": "Republican" } ] } } }
//! ```

use std::collections::BTreeMap;

use foundation::ids::{Affiliation, RegionId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/60";
pub const MISSING_RELIGION: &str = "—";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Official {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "position", default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub party: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    /// Any other fields the dataset carries.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Official {
    pub fn image_or_placeholder(&self) -> &str {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn religion_or_placeholder(&self) -> &str {
        self.religion
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(MISSING_RELIGION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(default = "unknown_party", deserialize_with = "party_or_unknown")]
    pub party: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub officials: Vec<Official>,
}

fn unknown_party() -> String {
    "Unknown".to_string()
}

/// Explicit `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` and empty labels read as "Unknown".
fn party_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|p| !p.is_empty())
        .unwrap_or_else(unknown_party))
}

impl RegionRecord {
    pub fn affiliation(&self) -> Affiliation {
        Affiliation::from_party(&self.party)
    }
}

/// Ordering contract:
/// - Regions iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub states: BTreeMap<String, RegionRecord>,
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Roster {
    pub fn from_json_str(payload: &str) -> Result<Self, RosterError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn get(&self, region: &RegionId) -> Option<&RegionRecord> {
        self.states.get(region.as_str())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Combines several roster sources into a new one.
    ///
    /// Officials of a region are concatenated in source order. The party of
    /// the first source that lists the region wins.
    pub fn merged<'a>(sources: impl IntoIterator<Item = &'a Roster>) -> Roster {
        let mut out = Roster::default();
        for source in sources {
            for (name, record) in &source.states {
                match out.states.get_mut(name) {
                    Some(existing) => existing.officials.extend(record.officials.iter().cloned()),
                    None => {
                        out.states.insert(name.clone(), record.clone());
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{MISSING_RELIGION, PLACEHOLDER_IMAGE, Roster, RosterError};
    use foundation::ids::{Affiliation, RegionId};
    use pretty_assertions::assert_eq;

    const GOVERNORS: &str = r#"{ "states": {
        "Ohio": { "party": "Republican", "officials": [
            { "name": "Gov O", "position": "Governor", "party": "Republican",
              "image": "https://example.org/o.png", "religion": "Catholic", "since": 2019 }
        ] },
        "Oregon": { "party": "Democrat", "officials": [
            { "name": "Gov R", "position": "Governor", "party": "Democrat" }
        ] }
    } }"#;

    const SENATORS: &str = r#"{ "states": {
        "Ohio": { "party": "Democrat", "officials": [
            { "name": "Sen O", "position": "Senator", "party": "Democrat" }
        ] },
        "Utah": { "officials": [] }
    } }"#;

    #[test]
    fn parses_officials_with_fallbacks() {
        let roster = Roster::from_json_str(GOVERNORS).expect("parse");
        let ohio = roster.get(&RegionId::from("Ohio")).expect("ohio");
        assert_eq!(ohio.affiliation(), Affiliation::Majority);
        let gov = &ohio.officials[0];
        assert_eq!(gov.role, "Governor");
        assert_eq!(gov.religion_or_placeholder(), "Catholic");
        assert_eq!(gov.metadata.get("since"), Some(&serde_json::json!(2019)));

        let oregon = roster.get(&RegionId::from("Oregon")).expect("oregon");
        assert_eq!(oregon.affiliation(), Affiliation::Minority);
        assert_eq!(oregon.officials[0].image_or_placeholder(), PLACEHOLDER_IMAGE);
        assert_eq!(oregon.officials[0].religion_or_placeholder(), MISSING_RELIGION);
    }

    #[test]
    fn null_fields_fall_back_instead_of_failing() {
        let roster = Roster::from_json_str(
            r#"{ "states": {
                "Utah": { "party": null, "officials": [
                    { "name": "Gov U", "position": null, "party": null,
                      "image": null, "religion": null } ] },
                "Idaho": { "party": "", "officials": null }
            } }"#,
        )
        .expect("nulls are tolerated");

        let utah = roster.get(&RegionId::from("Utah")).expect("utah");
        assert_eq!(utah.party, "Unknown");
        assert_eq!(utah.affiliation(), Affiliation::Unknown);
        let gov = &utah.officials[0];
        assert_eq!(gov.role, "");
        assert_eq!(gov.party, "");
        assert_eq!(gov.image_or_placeholder(), PLACEHOLDER_IMAGE);
        assert_eq!(gov.religion_or_placeholder(), MISSING_RELIGION);

        let idaho = roster.get(&RegionId::from("Idaho")).expect("idaho");
        assert_eq!(idaho.party, "Unknown");
        assert!(idaho.officials.is_empty());
    }

    #[test]
    fn merge_concatenates_officials_per_region() {
        let a = Roster::from_json_str(GOVERNORS).expect("a");
        let b = Roster::from_json_str(SENATORS).expect("b");
        let merged = Roster::merged([&a, &b]);

        let ohio = merged.get(&RegionId::from("Ohio")).expect("ohio");
        let names: Vec<&str> = ohio.officials.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Gov O", "Sen O"]);
        assert_eq!(ohio.party, "Republican");

        let utah = merged.get(&RegionId::from("Utah")).expect("utah");
        assert_eq!(utah.party, "Unknown");
        assert_eq!(utah.affiliation(), Affiliation::Unknown);
        assert_eq!(merged.len(), 3);

        // Inputs are untouched.
        assert_eq!(a.get(&RegionId::from("Ohio")).map(|r| r.officials.len()), Some(1));
    }

    #[test]
    fn missing_states_key_is_an_error() {
        let err = Roster::from_json_str(r#"{ "regions": {} }"#).expect_err("no states");
        assert!(matches!(err, RosterError::Json(_)));
    }
}
