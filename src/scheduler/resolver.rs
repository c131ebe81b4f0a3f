//! Constraint-filtering greedy resolver.
//!
//! # Algorithm
//!
//! 1. Record every preassigned slot so group assignments count toward load
//!    and block their volunteer for that mass.
//! 2. For each unassigned slot in input order, narrow the roster:
//!    active volunteers holding a required skill, then those time-off
//!    permits (exclusive dates, then unavailable dates), then those not
//!    already serving the same (date, day-part).
//! 3. Rank the survivors with the rule engine; the first wins.
//! 4. When a filter empties the set, the slot stays open with the reason
//!    of the filter that emptied it.
//!
//! # Complexity
//! O(s * c * r) where s=slots, c=qualified candidates, r=rules.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::instrument;

use crate::dispatching::{Candidate, RuleEngine, SelectionContext, SelectionPolicy};
use crate::models::{
    AssignmentResult, DayPart, RoleSlot, SkillMap, SlotDecision, SlotOutcome, SlotVolunteer,
    UnfilledReason, VolunteerPool,
};
use crate::time_off::TimeOffIndex;

/// Input container for resolution.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Slots to fill, in processing order.
    pub slots: Vec<RoleSlot>,
    /// Volunteer roster.
    pub pool: VolunteerPool,
    /// Approved time-off for the month.
    pub index: TimeOffIndex,
    /// Ministry/role → skill tags.
    pub skills: SkillMap,
}

impl ResolveRequest {
    /// Creates a request with an empty time-off index and skill map.
    pub fn new(slots: Vec<RoleSlot>, pool: VolunteerPool) -> Self {
        Self {
            slots,
            pool,
            index: TimeOffIndex::default(),
            skills: SkillMap::new(),
        }
    }

    /// Sets the time-off index.
    pub fn with_index(mut self, index: TimeOffIndex) -> Self {
        self.index = index;
        self
    }

    /// Sets the skill map.
    pub fn with_skills(mut self, skills: SkillMap) -> Self {
        self.skills = skills;
        self
    }
}

/// Greedy slot resolver.
///
/// Each slot is decided once, in input order, and the result depends only
/// on the inputs: identical inputs always yield identical decisions.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use ministry_schedule::models::{DayPart, RoleSlot, Volunteer, VolunteerPool};
/// use ministry_schedule::scheduler::{ResolveRequest, Resolver};
///
/// let date = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();
/// let slots = vec![RoleSlot::new("S1", date, DayPart::NonVigil, "Lector")];
/// let pool = VolunteerPool::new(vec![Volunteer::new("V1", "Ann").with_skill("Lector")]);
///
/// let result = Resolver::new().resolve_request(&ResolveRequest::new(slots, pool));
/// assert_eq!(result.summary.filled, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    rule_engine: RuleEngine,
}

type Booking = (String, NaiveDate, DayPart);

impl Resolver {
    /// Creates a resolver with the default selection policy.
    pub fn new() -> Self {
        Self {
            rule_engine: SelectionPolicy::default().engine(),
        }
    }

    /// Uses a named selection policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.rule_engine = policy.engine();
        self
    }

    /// Uses a custom rule engine for candidate ranking.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Fills unassigned slots.
    ///
    /// Never fails: slots that cannot be filled are reported with a reason.
    #[instrument(level = "debug", skip_all, fields(slots = slots.len(), volunteers = pool.len()))]
    pub fn resolve(
        &self,
        slots: &[RoleSlot],
        pool: &VolunteerPool,
        index: &TimeOffIndex,
        skills: &SkillMap,
    ) -> AssignmentResult {
        let mut result = AssignmentResult::new();
        let mut context = SelectionContext::new();
        let mut booked: HashSet<Booking> = HashSet::new();

        // Preassigned slots are keyed by the roster id they refer to, so a
        // name-only reference still books and loads the right volunteer.
        for slot in slots {
            if let Some(v) = &slot.volunteer {
                let key = pool
                    .lookup(&v.id, &v.name)
                    .map_or(v.id.as_str(), |roster| roster.id.as_str());
                context.record(key, slot.date);
                booked.insert((key.to_string(), slot.date, slot.day_part));
            }
        }

        let has_active = pool.has_active();

        for slot in slots {
            let outcome = match &slot.volunteer {
                Some(v) => SlotOutcome::Preassigned(v.clone()),
                None if !has_active => SlotOutcome::Unfilled(UnfilledReason::NoActiveVolunteers),
                None => {
                    match self.pick(slot, pool, index, skills, &context, &booked) {
                        Ok(chosen) => {
                            context.record(&chosen.id, slot.date);
                            booked.insert((chosen.id.clone(), slot.date, slot.day_part));
                            SlotOutcome::Assigned(chosen)
                        }
                        Err(reason) => {
                            tracing::debug!(
                                slot = %slot.id,
                                date = %slot.date,
                                day_part = %slot.day_part,
                                ministry = %slot.ministry,
                                %reason,
                                "slot left open"
                            );
                            SlotOutcome::Unfilled(reason)
                        }
                    }
                }
            };

            result.record(SlotDecision {
                slot_id: slot.id.clone(),
                date: slot.date,
                day_part: slot.day_part,
                ministry: slot.ministry.clone(),
                role: slot.role.clone(),
                outcome,
            });
        }

        tracing::info!(
            filled = result.summary.filled,
            preassigned = result.summary.preassigned,
            open = result.summary.open,
            "resolution finished"
        );
        result
    }

    /// Resolves from a request.
    pub fn resolve_request(&self, request: &ResolveRequest) -> AssignmentResult {
        self.resolve(&request.slots, &request.pool, &request.index, &request.skills)
    }

    fn pick(
        &self,
        slot: &RoleSlot,
        pool: &VolunteerPool,
        index: &TimeOffIndex,
        skills: &SkillMap,
        context: &SelectionContext,
        booked: &HashSet<Booking>,
    ) -> Result<SlotVolunteer, UnfilledReason> {
        let required = skills.required_for(slot);
        let qualified: Vec<Candidate<'_>> = pool
            .candidates_for(&required)
            .into_iter()
            .filter_map(|position| {
                pool.get(position)
                    .map(|volunteer| Candidate { position, volunteer })
            })
            .collect();
        if qualified.is_empty() {
            return Err(UnfilledReason::NoQualifiedVolunteer);
        }

        let permitted: Vec<Candidate<'_>> = qualified
            .into_iter()
            .filter(|c| {
                index.exclusive_permits(&c.volunteer.name, slot.date, slot.day_part)
                    && !index.is_unavailable(&c.volunteer.name, slot.date, slot.day_part)
            })
            .collect();
        if permitted.is_empty() {
            return Err(UnfilledReason::AllUnavailable);
        }

        let free: Vec<Candidate<'_>> = permitted
            .into_iter()
            .filter(|c| !booked.contains(&(c.volunteer.id.clone(), slot.date, slot.day_part)))
            .collect();

        self.rule_engine
            .select_best(&free, context)
            .and_then(|i| free.get(i))
            .map(|c| SlotVolunteer::new(&c.volunteer.id, &c.volunteer.name))
            .ok_or(UnfilledReason::NoQualifiedVolunteer)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequestKind, TimeOffRequest, Volunteer};
    use crate::time_off::build_time_off_index;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn lector(id: &str, d: u32, part: DayPart) -> RoleSlot {
        RoleSlot::new(id, date(d), part, "Lector")
    }

    fn index_for(requests: &[TimeOffRequest]) -> TimeOffIndex {
        build_time_off_index(requests, 2026, 4, &BTreeSet::new())
            .unwrap()
            .index
    }

    fn time_off(id: &str, name: &str, kind: RequestKind) -> TimeOffRequest {
        TimeOffRequest::new(id, name, kind, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
            .approved()
    }

    fn volunteer_of(result: &AssignmentResult, slot: &str) -> Option<String> {
        result
            .decision_for(slot)
            .and_then(|d| d.outcome.volunteer())
            .map(|v| v.id.clone())
    }

    #[test]
    fn test_single_slot_filled() {
        let slots = vec![lector("S1", 5, DayPart::NonVigil)];
        let pool = VolunteerPool::new(vec![Volunteer::new("A", "Ann").with_skill("Lector")]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        assert_eq!(volunteer_of(&result, "S1").as_deref(), Some("A"));
        assert_eq!(result.summary.filled, 1);
        assert_eq!(result.summary.open, 0);
    }

    #[test]
    fn test_end_to_end_three_lector_slots() {
        let slots = vec![
            lector("S1", 5, DayPart::NonVigil),
            lector("S2", 5, DayPart::NonVigil),
            lector("S3", 5, DayPart::NonVigil),
        ];
        let pool = VolunteerPool::new(vec![
            Volunteer::new("A", "Volunteer A").with_skill("Lector"),
            Volunteer::new("B", "Volunteer B").with_skill("Lector"),
            Volunteer::new("C", "Volunteer C").with_skill("Lector").inactive(),
        ]);
        let index = index_for(&[time_off("R1", "Volunteer B", RequestKind::Unavailable)
            .with_date(date(5), DayPart::NonVigil)]);
        let skills = SkillMap::new().with("Lector", &["Lector"]);

        let result = Resolver::new().resolve(&slots, &pool, &index, &skills);

        assert_eq!(volunteer_of(&result, "S1").as_deref(), Some("A"));
        assert_eq!(result.summary.filled, 1);
        assert_eq!(result.summary.open, 2);
        assert_eq!(result.open_count(UnfilledReason::NoQualifiedVolunteer), 2);
        assert!(result.assignments_for_volunteer("B").is_empty());
        assert!(result.assignments_for_volunteer("C").is_empty());
    }

    #[test]
    fn test_unavailable_never_assigned() {
        let pool = VolunteerPool::new(vec![
            Volunteer::new("A", "Ann").with_skill("Lector"),
            Volunteer::new("B", "Ben").with_skill("Lector"),
        ]);
        let index = index_for(&[
            time_off("R1", "Ann", RequestKind::Unavailable).with_date(date(5), DayPart::Vigil)
        ]);
        let slots: Vec<RoleSlot> = (0..6)
            .map(|i| {
                let part = if i % 2 == 0 { DayPart::Vigil } else { DayPart::NonVigil };
                lector(&format!("S{i}"), 5, part)
            })
            .collect();

        let result = Resolver::new().resolve(&slots, &pool, &index, &SkillMap::new());
        for d in &result.decisions {
            if d.day_part == DayPart::Vigil {
                assert_ne!(d.outcome.volunteer().map(|v| v.id.as_str()), Some("A"));
            }
        }
        // Ann still serves the daytime mass
        assert_eq!(volunteer_of(&result, "S1").as_deref(), Some("A"));
    }

    #[test]
    fn test_all_unavailable_reason() {
        let slots = vec![lector("S1", 5, DayPart::Vigil)];
        let pool = VolunteerPool::new(vec![Volunteer::new("A", "Ann").with_skill("Lector")]);
        let index = index_for(&[
            time_off("R1", "ann", RequestKind::Unavailable).with_date(date(5), DayPart::Vigil)
        ]);

        let result = Resolver::new().resolve(&slots, &pool, &index, &SkillMap::new());
        assert_eq!(
            result.decision_for("S1").unwrap().outcome,
            SlotOutcome::Unfilled(UnfilledReason::AllUnavailable)
        );
    }

    #[test]
    fn test_exclusive_restricts_to_listed_dates() {
        let pool = VolunteerPool::new(vec![Volunteer::new("A", "Ann").with_skill("Lector")]);
        let index = index_for(&[time_off("R1", "Ann", RequestKind::ExclusivelyAvailable)
            .with_date(date(12), DayPart::NonVigil)]);

        let mut slots = Vec::new();
        for d in [5, 11, 12, 19, 26] {
            for part in DayPart::ALL {
                slots.push(lector(&format!("S{d}-{part}"), d, part));
            }
        }

        let result = Resolver::new().resolve(&slots, &pool, &index, &SkillMap::new());
        let held = result.assignments_for_volunteer("A");
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].date, date(12));
        assert_eq!(held[0].day_part, DayPart::NonVigil);
        assert_eq!(result.open_count(UnfilledReason::AllUnavailable), 9);
    }

    #[test]
    fn test_unavailable_wins_over_exclusive() {
        let pool = VolunteerPool::new(vec![Volunteer::new("A", "Ann").with_skill("Lector")]);
        let index = index_for(&[
            time_off("R1", "Ann", RequestKind::ExclusivelyAvailable)
                .with_date(date(12), DayPart::NonVigil),
            time_off("R2", "Ann", RequestKind::Unavailable).with_date(date(12), DayPart::NonVigil),
        ]);
        let slots = vec![lector("S1", 12, DayPart::NonVigil)];

        let result = Resolver::new().resolve(&slots, &pool, &index, &SkillMap::new());
        assert_eq!(result.open_count(UnfilledReason::AllUnavailable), 1);
    }

    #[test]
    fn test_no_active_volunteers() {
        let slots = vec![lector("S1", 5, DayPart::NonVigil), lector("S2", 12, DayPart::Vigil)];
        let pool = VolunteerPool::new(vec![Volunteer::new("C", "Cara").with_skill("Lector").inactive()]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        assert_eq!(result.open_count(UnfilledReason::NoActiveVolunteers), 2);

        let empty = Resolver::new().resolve(
            &slots,
            &VolunteerPool::default(),
            &TimeOffIndex::default(),
            &SkillMap::new(),
        );
        assert_eq!(empty.open_count(UnfilledReason::NoActiveVolunteers), 2);
    }

    #[test]
    fn test_missing_skill() {
        let slots = vec![RoleSlot::new("S1", date(5), DayPart::NonVigil, "Altar Server")];
        let pool = VolunteerPool::new(vec![Volunteer::new("A", "Ann").with_skill("Lector")]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        assert_eq!(result.open_count(UnfilledReason::NoQualifiedVolunteer), 1);
    }

    #[test]
    fn test_skill_map_aliases() {
        let slots = vec![
            RoleSlot::new("S1", date(5), DayPart::NonVigil, "Lector").with_role("First Reading")
        ];
        let pool = VolunteerPool::new(vec![
            Volunteer::new("A", "Ann").with_skill("Cantor"),
            Volunteer::new("B", "Ben").with_skill("Reader"),
        ]);
        let skills = SkillMap::new().with("First Reading", &["Lector", "Reader"]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &skills);
        assert_eq!(volunteer_of(&result, "S1").as_deref(), Some("B"));
    }

    #[test]
    fn test_preassigned_untouched_and_counted() {
        let slots = vec![
            lector("S1", 5, DayPart::NonVigil),
            lector("S2", 5, DayPart::NonVigil).with_volunteer("A", "Ann"),
            lector("S3", 12, DayPart::NonVigil),
        ];
        let pool = VolunteerPool::new(vec![
            Volunteer::new("A", "Ann").with_skill("Lector"),
            Volunteer::new("B", "Ben").with_skill("Lector"),
        ]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        assert_eq!(
            result.decision_for("S2").unwrap().outcome,
            SlotOutcome::Preassigned(SlotVolunteer::new("A", "Ann"))
        );
        // A already serves the 5th, so S1 goes to B; B then has one slot as
        // does A, and roster order gives S3 to A.
        assert_eq!(volunteer_of(&result, "S1").as_deref(), Some("B"));
        assert_eq!(volunteer_of(&result, "S3").as_deref(), Some("A"));
        assert_eq!(result.summary.preassigned, 1);
        assert_eq!(result.summary.filled, 2);
    }

    #[test]
    fn test_preassigned_by_name_books_roster_volunteer() {
        let slots = vec![
            lector("S1", 5, DayPart::NonVigil).with_volunteer("Ann", "Ann"),
            lector("S2", 5, DayPart::NonVigil),
            lector("S3", 12, DayPart::NonVigil),
        ];
        let pool = VolunteerPool::new(vec![
            Volunteer::new("V1", "Ann").with_skill("Lector"),
            Volunteer::new("V2", "Ben").with_skill("Lector"),
        ]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        // V1 already serves the 5th through S1, so S2 goes to Ben and the
        // load tie on the 12th breaks by roster order.
        assert_eq!(volunteer_of(&result, "S2").as_deref(), Some("V2"));
        assert_eq!(volunteer_of(&result, "S3").as_deref(), Some("V1"));
    }

    #[test]
    fn test_fewest_assignments_balances_load() {
        let slots: Vec<RoleSlot> = [5, 12, 19, 26]
            .iter()
            .map(|&d| lector(&format!("S{d}"), d, DayPart::NonVigil))
            .collect();
        let pool = VolunteerPool::new(vec![
            Volunteer::new("A", "Ann").with_skill("Lector"),
            Volunteer::new("B", "Ben").with_skill("Lector"),
        ]);

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        let ids: Vec<String> = ["S5", "S12", "S19", "S26"]
            .iter()
            .filter_map(|s| volunteer_of(&result, s))
            .collect();
        assert_eq!(ids, vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn test_roster_order_policy() {
        let slots: Vec<RoleSlot> = [5, 12]
            .iter()
            .map(|&d| lector(&format!("S{d}"), d, DayPart::NonVigil))
            .collect();
        let pool = VolunteerPool::new(vec![
            Volunteer::new("A", "Ann").with_skill("Lector"),
            Volunteer::new("B", "Ben").with_skill("Lector"),
        ]);

        let result = Resolver::new()
            .with_policy(SelectionPolicy::RosterOrder)
            .resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        assert_eq!(result.assignments_for_volunteer("A").len(), 2);
    }

    #[test]
    fn test_deterministic_output() {
        let mut rng = StdRng::seed_from_u64(42);
        let ministries = ["Lector", "Cantor", "Altar Server"];

        let volunteers: Vec<Volunteer> = (0..12)
            .map(|i| {
                let mut v = Volunteer::new(format!("V{i}"), format!("Volunteer {i}"));
                for m in ministries {
                    if rng.random_range(0..2) == 1 {
                        v = v.with_skill(m);
                    }
                }
                if rng.random_range(0..6) == 0 {
                    v = v.inactive();
                }
                v
            })
            .collect();
        let pool = VolunteerPool::new(volunteers);

        let requests: Vec<TimeOffRequest> = (0..10)
            .map(|i| {
                let kind = if i % 3 == 0 {
                    RequestKind::ExclusivelyAvailable
                } else {
                    RequestKind::Unavailable
                };
                let part = DayPart::ALL[rng.random_range(0..2)];
                time_off(&format!("R{i}"), &format!("Volunteer {}", rng.random_range(0..12)), kind)
                    .with_date(date(rng.random_range(1..=30)), part)
            })
            .collect();
        let index = index_for(&requests);

        let slots: Vec<RoleSlot> = (0..40)
            .map(|i| {
                RoleSlot::new(
                    format!("S{i}"),
                    date(rng.random_range(1..=30)),
                    DayPart::ALL[rng.random_range(0..2)],
                    ministries[rng.random_range(0..3)],
                )
            })
            .collect();

        let resolver = Resolver::new();
        let first = resolver.resolve(&slots, &pool, &index, &SkillMap::new());
        let second = resolver.resolve(&slots, &pool, &index, &SkillMap::new());

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.decisions.len(), slots.len());
    }

    #[test]
    fn test_no_double_booking() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = VolunteerPool::new(
            (0..4)
                .map(|i| Volunteer::new(format!("V{i}"), format!("V{i}")).with_skill("Lector"))
                .collect(),
        );
        let slots: Vec<RoleSlot> = (0..30)
            .map(|i| {
                lector(
                    &format!("S{i}"),
                    rng.random_range(1..=7),
                    DayPart::ALL[rng.random_range(0..2)],
                )
            })
            .collect();

        let result = Resolver::new().resolve(&slots, &pool, &TimeOffIndex::default(), &SkillMap::new());
        let mut seen = HashSet::new();
        for d in &result.decisions {
            if let Some(v) = d.outcome.volunteer() {
                assert!(seen.insert((v.id.clone(), d.date, d.day_part)));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let result = Resolver::new().resolve(
            &[],
            &VolunteerPool::default(),
            &TimeOffIndex::default(),
            &SkillMap::new(),
        );
        assert!(result.decisions.is_empty());
        assert_eq!(result.summary.filled, 0);
        assert_eq!(result.summary.open, 0);
    }
}
