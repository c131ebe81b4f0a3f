//! Ministry → required skill lookup.
//!
//! Derived from the schedule template. A role is qualified by any one of its
//! tags; multiple tags are aliases for the same training (e.g., "EM" and
//! "Eucharistic Minister").

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::volunteer::normalize;
use super::RoleSlot;

/// Static lookup from ministry or role name to skill tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct SkillMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl SkillMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requirement for a ministry or role.
    pub fn with(mut self, name: impl Into<String>, skills: &[&str]) -> Self {
        self.insert(name, skills.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Inserts (or replaces) a requirement.
    pub fn insert(&mut self, name: impl Into<String>, skills: Vec<String>) {
        self.entries.insert(normalize(&name.into()), skills);
    }

    /// Tags configured for a name, if any.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(&normalize(name)).map(Vec::as_slice)
    }

    /// Number of configured names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Skill tags required by a slot.
    ///
    /// The specific role is looked up first, then the ministry. When
    /// neither is configured the ministry name itself is the tag.
    pub fn required_for(&self, slot: &RoleSlot) -> Vec<String> {
        if let Some(tags) = self.get(&slot.role).filter(|t| !t.is_empty()) {
            return tags.to_vec();
        }
        if let Some(tags) = self.get(&slot.ministry).filter(|t| !t.is_empty()) {
            return tags.to_vec();
        }
        tracing::debug!(
            ministry = %slot.ministry,
            role = %slot.role,
            "no skill mapping, requiring the ministry name"
        );
        vec![slot.ministry.clone()]
    }
}

impl From<BTreeMap<String, Vec<String>>> for SkillMap {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<SkillMap> for BTreeMap<String, Vec<String>> {
    fn from(map: SkillMap) -> Self {
        map.entries
    }
}

impl FromIterator<(String, Vec<String>)> for SkillMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, skills) in iter {
            map.insert(name, skills);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayPart;
    use chrono::NaiveDate;

    fn slot(ministry: &str, role: &str) -> RoleSlot {
        RoleSlot::new(
            "row",
            NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
            DayPart::NonVigil,
            ministry,
        )
        .with_role(role)
    }

    #[test]
    fn test_role_takes_precedence() {
        let map = SkillMap::new()
            .with("Lector", &["Lector"])
            .with("Psalmist", &["Cantor"]);

        assert_eq!(map.required_for(&slot("Lector", "Psalmist")), vec!["Cantor"]);
        assert_eq!(map.required_for(&slot("Lector", "First Reading")), vec!["Lector"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let map = SkillMap::new().with("Eucharistic Minister", &["EM", "Eucharistic Minister"]);
        assert_eq!(map.get("eucharistic minister").map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_unmapped_falls_back_to_ministry() {
        let map = SkillMap::new();
        assert_eq!(map.required_for(&slot("Usher", "Usher")), vec!["Usher"]);
    }
}
