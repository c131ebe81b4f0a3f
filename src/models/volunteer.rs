//! Volunteer model.
//!
//! Volunteers are the people who fill role-slots: readers, servers,
//! ministers. Each has an active flag and a set of skill tags naming the
//! ministries they are trained for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A volunteer who can be assigned to role-slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    /// Unique volunteer identifier (written back with assignments).
    pub id: String,
    /// Display name. Also the key of the time-off index.
    pub name: String,
    /// Contact email. Alternative join key for time-off requests.
    pub email: String,
    /// Whether the volunteer takes part in resolution.
    pub status: VolunteerStatus,
    /// Skill tags (e.g., "Lector", "Altar Server").
    pub skills: Vec<String>,
}

/// Volunteer participation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolunteerStatus {
    /// Eligible for assignment.
    #[default]
    Active,
    /// Kept on the roster but never assigned.
    Inactive,
}

impl Volunteer {
    /// Creates an active volunteer with no skills.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            status: VolunteerStatus::Active,
            skills: Vec::new(),
        }
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Adds a skill tag.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Marks the volunteer inactive.
    pub fn inactive(mut self) -> Self {
        self.status = VolunteerStatus::Inactive;
        self
    }

    /// Whether the volunteer participates in resolution.
    pub fn is_active(&self) -> bool {
        self.status == VolunteerStatus::Active
    }

    /// Whether this volunteer holds a skill (case-insensitive, trimmed).
    pub fn has_skill(&self, skill: &str) -> bool {
        let wanted = normalize(skill);
        self.skills.iter().any(|s| normalize(s) == wanted)
    }

    /// Whether a (name, email) pair identifies this volunteer.
    ///
    /// Either field matching is enough, so a submitter who varies one
    /// of them is still recognized.
    pub fn matches_identity(&self, name: &str, email: &str) -> bool {
        same_person(&self.name, &self.email, name, email)
    }
}

/// Whether two (name, email) pairs refer to the same person.
///
/// Names compare case-insensitively after trimming; emails the same way.
/// Blank fields never match.
pub fn same_person(name_a: &str, email_a: &str, name_b: &str, email_b: &str) -> bool {
    let names = !name_a.trim().is_empty() && normalize(name_a) == normalize(name_b);
    let emails = !email_a.trim().is_empty() && normalize(email_a) == normalize(email_b);
    names || emails
}

pub(crate) fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// An ordered volunteer roster indexed by skill.
///
/// Roster order is preserved; it is the final tie-break when choosing
/// between equally suitable candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolunteerPool {
    volunteers: Vec<Volunteer>,
    /// Normalized skill tag → roster positions (active volunteers only).
    by_skill: BTreeMap<String, Vec<usize>>,
}

impl VolunteerPool {
    /// Builds a pool from a roster.
    pub fn new(volunteers: Vec<Volunteer>) -> Self {
        let mut by_skill: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (pos, v) in volunteers.iter().enumerate() {
            if !v.is_active() {
                continue;
            }
            for skill in &v.skills {
                let entry = by_skill.entry(normalize(skill)).or_default();
                if entry.last() != Some(&pos) {
                    entry.push(pos);
                }
            }
        }
        Self {
            volunteers,
            by_skill,
        }
    }

    /// All volunteers in roster order.
    pub fn volunteers(&self) -> &[Volunteer] {
        &self.volunteers
    }

    /// Volunteer at a roster position.
    pub fn get(&self, pos: usize) -> Option<&Volunteer> {
        self.volunteers.get(pos)
    }

    /// Number of volunteers (active or not).
    pub fn len(&self) -> usize {
        self.volunteers.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.volunteers.is_empty()
    }

    /// Whether any volunteer is active.
    pub fn has_active(&self) -> bool {
        self.volunteers.iter().any(Volunteer::is_active)
    }

    /// Active volunteers in roster order.
    pub fn active(&self) -> impl Iterator<Item = &Volunteer> {
        self.volunteers.iter().filter(|v| v.is_active())
    }

    /// Finds a volunteer by id (exact, trimmed). Blank never matches.
    pub fn by_id(&self, id: &str) -> Option<&Volunteer> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        self.volunteers.iter().find(|v| v.id == id)
    }

    /// Finds the roster volunteer a slot reference points at: by id first,
    /// then by name. Blank fields never match.
    pub fn lookup(&self, id: &str, name: &str) -> Option<&Volunteer> {
        if let Some(v) = self.by_id(id) {
            return Some(v);
        }
        if name.trim().is_empty() {
            return None;
        }
        self.by_name(name)
    }

    /// Finds a volunteer by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&Volunteer> {
        let wanted = normalize(name);
        self.volunteers.iter().find(|v| normalize(&v.name) == wanted)
    }

    /// Finds a volunteer by email (case-insensitive). Blank never matches.
    pub fn by_email(&self, email: &str) -> Option<&Volunteer> {
        if email.trim().is_empty() {
            return None;
        }
        let wanted = normalize(email);
        self.volunteers.iter().find(|v| normalize(&v.email) == wanted)
    }

    /// Roster positions of active volunteers holding any of `skills`,
    /// ascending.
    pub fn candidates_for(&self, skills: &[String]) -> Vec<usize> {
        let mut positions: Vec<usize> = skills
            .iter()
            .filter_map(|s| self.by_skill.get(&normalize(s)))
            .flatten()
            .copied()
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }
}
