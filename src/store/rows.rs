//! Loosely typed table rows and their conversion to models.
//!
//! Every cell is a string and may be blank. Conversion happens once, at the
//! store boundary, with these defaults:
//!
//! | Table | Cell | Blank means |
//! |-------|------|-------------|
//! | Volunteers | `id` | the name is the id |
//! | Volunteers | `status` | Active |
//! | Volunteers | `skills` | no skills |
//! | Time-off | `status` | Pending |
//! | Time-off | `submitted_at` | Unix epoch (never recent) |
//! | Time-off | day-part of a date | both day-parts |
//! | Time-off | `dates` | every day of `start_date..=end_date`, both day-parts |
//! | Slots | `day_part` | NonVigil |
//! | Slots | `role` | the ministry |
//!
//! Rows that cannot become a model (no name, no date, no ministry) are
//! logged and skipped; they never abort a run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    parse_date, parse_date_time, DayPart, RequestKind, RequestStatus, RoleSlot, TimeOffEntry,
    TimeOffRequest, Volunteer, VolunteerStatus,
};

/// Longest declared range expanded into per-day entries.
pub const MAX_EXPANDED_RANGE_DAYS: i64 = 366;

/// A Volunteers table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolunteerRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
    /// Comma or semicolon separated skill tags.
    pub skills: String,
}

/// A time-off requests table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOffRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub kind: String,
    pub status: String,
    pub submitted_at: String,
    pub start_date: String,
    pub end_date: String,
    /// Comma or semicolon separated items, each a date or date-time
    /// optionally followed by a day-part: `2026-04-05 Vigil`,
    /// `04/12/2026 (NonVigil)`, `2026-04-19`.
    pub dates: String,
}

/// A role-slot (assignments) table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotRow {
    pub row_ref: String,
    pub date: String,
    pub day_part: String,
    pub ministry: String,
    pub role: String,
    pub volunteer_id: String,
    pub volunteer_name: String,
    pub status: String,
}

impl VolunteerRow {
    /// Converts to a volunteer, or `None` when the row has no name.
    pub fn to_volunteer(&self) -> Option<Volunteer> {
        let name = self.name.trim();
        if name.is_empty() {
            tracing::warn!(id = %self.id, "volunteer row has no name, skipped");
            return None;
        }
        let id = match self.id.trim() {
            "" => name,
            id => id,
        };

        let mut volunteer = Volunteer::new(id, name).with_email(self.email.trim());
        volunteer.status = parse_volunteer_status(&self.status, name);
        volunteer.skills = split_list(&self.skills).map(str::to_string).collect();
        Some(volunteer)
    }
}

impl TimeOffRow {
    /// Converts to a request, or `None` when the row has no name and no
    /// email to join on.
    pub fn to_request(&self) -> Option<TimeOffRequest> {
        if self.name.trim().is_empty() && self.email.trim().is_empty() {
            tracing::warn!(id = %self.id, "time-off row has no name or email, skipped");
            return None;
        }

        let submitted_at = match parse_date_time(&self.submitted_at) {
            Some(at) => at.and_utc(),
            None => {
                if !self.submitted_at.trim().is_empty() {
                    tracing::warn!(
                        id = %self.id,
                        cell = %self.submitted_at,
                        "unparsable submission time"
                    );
                }
                DateTime::<Utc>::default()
            }
        };

        let mut request = TimeOffRequest::new(
            self.id.trim(),
            self.name.trim(),
            RequestKind::parse(&self.kind),
            submitted_at,
        )
        .with_email(self.email.trim())
        .with_status(RequestStatus::parse(&self.status));

        let start = self.range_bound(&self.start_date, "start_date");
        let end = self.range_bound(&self.end_date, "end_date");
        if let (Some(start), Some(end)) = (start, end) {
            request = request.with_range(start, end);
        }

        request.entries = self.entries();
        if request.entries.is_empty() && self.dates.trim().is_empty() {
            if let (Some(start), Some(end)) = (start, end) {
                request.entries = expand_range(&self.id, start, end);
            }
        }
        Some(request)
    }

    fn range_bound(&self, cell: &str, column: &'static str) -> Option<NaiveDate> {
        let parsed = parse_date(cell);
        if parsed.is_none() && !cell.trim().is_empty() {
            tracing::warn!(id = %self.id, column, %cell, "unparsable date, ignored");
        }
        parsed
    }

    fn entries(&self) -> Vec<TimeOffEntry> {
        let mut entries = Vec::new();
        for item in split_list(&self.dates) {
            match parse_dated_item(item) {
                Some((at, Some(part))) => entries.push(TimeOffEntry::new(at, part)),
                Some((at, None)) => {
                    entries.extend(DayPart::ALL.iter().map(|&part| TimeOffEntry::new(at, part)));
                }
                None => {
                    tracing::warn!(id = %self.id, %item, "unparsable time-off date, skipped");
                }
            }
        }
        entries
    }
}

impl SlotRow {
    /// Converts to a role-slot, or `None` when date or ministry is missing.
    pub fn to_slot(&self) -> Option<RoleSlot> {
        let Some(date) = parse_date(&self.date) else {
            tracing::warn!(row = %self.row_ref, cell = %self.date, "slot row has no usable date, skipped");
            return None;
        };
        let ministry = self.ministry.trim();
        if ministry.is_empty() {
            tracing::warn!(row = %self.row_ref, "slot row has no ministry, skipped");
            return None;
        }

        let day_part = if self.day_part.trim().is_empty() {
            DayPart::NonVigil
        } else {
            match self.day_part.parse::<DayPart>() {
                Ok(part) => part,
                Err(e) => {
                    tracing::warn!(row = %self.row_ref, "{e}, using NonVigil");
                    DayPart::NonVigil
                }
            }
        };

        let mut slot = RoleSlot::new(self.row_ref.trim(), date, day_part, ministry);
        if !self.role.trim().is_empty() {
            slot = slot.with_role(self.role.trim());
        }

        let id = self.volunteer_id.trim();
        let name = self.volunteer_name.trim();
        if !id.is_empty() || !name.is_empty() {
            let id = if id.is_empty() { name } else { id };
            slot = slot.with_volunteer(id, name);
        }
        Some(slot)
    }
}

fn parse_volunteer_status(cell: &str, name: &str) -> VolunteerStatus {
    match cell.trim().to_lowercase().as_str() {
        "" | "active" | "yes" | "true" => VolunteerStatus::Active,
        "inactive" | "no" | "false" | "retired" | "on leave" => VolunteerStatus::Inactive,
        other => {
            tracing::warn!(volunteer = %name, status = %other, "unknown volunteer status, treating as inactive");
            VolunteerStatus::Inactive
        }
    }
}

fn split_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Splits `date [part]` or `date (part)` into its instant and day-part.
fn parse_dated_item(item: &str) -> Option<(NaiveDateTime, Option<DayPart>)> {
    if let Some(open) = item.rfind('(') {
        if item.ends_with(')') {
            let part = item[open + 1..item.len() - 1].parse::<DayPart>().ok()?;
            return parse_date_time(&item[..open]).map(|at| (at, Some(part)));
        }
    }

    if let Some((head, tail)) = item.rsplit_once(char::is_whitespace) {
        if let Ok(part) = tail.parse::<DayPart>() {
            return parse_date_time(head).map(|at| (at, Some(part)));
        }
    }

    parse_date_time(item).map(|at| (at, None))
}

fn expand_range(id: &str, start: NaiveDate, end: NaiveDate) -> Vec<TimeOffEntry> {
    let days = (end - start).num_days();
    if days < 0 {
        return Vec::new();
    }
    if days >= MAX_EXPANDED_RANGE_DAYS {
        tracing::warn!(%id, days = days + 1, "declared range too long to expand, skipped");
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .flat_map(|d| DayPart::ALL.map(|part| TimeOffEntry::on(d, part)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_volunteer_row_defaults() {
        let row = VolunteerRow {
            name: " Ann Lee ".into(),
            skills: "Lector; Cantor,".into(),
            ..Default::default()
        };
        let v = row.to_volunteer().unwrap();
        assert_eq!(v.id, "Ann Lee");
        assert!(v.is_active());
        assert_eq!(v.skills, vec!["Lector", "Cantor"]);
    }

    #[test]
    fn test_volunteer_row_status() {
        let row = |status: &str| VolunteerRow {
            id: "V1".into(),
            name: "Ann".into(),
            status: status.into(),
            ..Default::default()
        };
        assert!(!row("Inactive").to_volunteer().unwrap().is_active());
        assert!(!row("moved away").to_volunteer().unwrap().is_active());
        assert!(row("ACTIVE").to_volunteer().unwrap().is_active());
        assert!(VolunteerRow::default().to_volunteer().is_none());
    }

    #[test]
    fn test_time_off_dates_cell() {
        let row = TimeOffRow {
            id: "R1".into(),
            name: "Ann".into(),
            kind: "Unavailable".into(),
            status: "Approved".into(),
            submitted_at: "2026-03-01T09:30:00Z".into(),
            dates: "2026-04-04 Vigil; 04/12/2026 (NonVigil), 2026-04-19, garbage".into(),
            ..Default::default()
        };
        let r = row.to_request().unwrap();

        assert!(r.is_approved());
        assert_eq!(r.kind, RequestKind::Unavailable);
        assert_eq!(r.entries.len(), 4);
        assert_eq!(r.entries[0], TimeOffEntry::on(date(2026, 4, 4), DayPart::Vigil));
        assert_eq!(r.entries[1], TimeOffEntry::on(date(2026, 4, 12), DayPart::NonVigil));
        assert_eq!(r.entries[2].day_part, DayPart::Vigil);
        assert_eq!(r.entries[3].day_part, DayPart::NonVigil);
        assert_eq!(r.entries[3].date(), date(2026, 4, 19));
    }

    #[test]
    fn test_time_off_date_time_item_keeps_clock() {
        let row = TimeOffRow {
            name: "Ann".into(),
            dates: "2026-04-30 23:30 Vigil".into(),
            ..Default::default()
        };
        let r = row.to_request().unwrap();
        assert_eq!(r.entries.len(), 1);
        assert_eq!(
            r.entries[0].at,
            date(2026, 4, 30).and_time(NaiveTime::from_hms_opt(23, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_time_off_range_expansion() {
        let row = TimeOffRow {
            name: "Ann".into(),
            start_date: "2026-04-10".into(),
            end_date: "2026-04-12".into(),
            ..Default::default()
        };
        let r = row.to_request().unwrap();
        assert_eq!(r.status, RequestStatus::Pending);
        assert_eq!(r.entries.len(), 6);
        assert_eq!(r.span().unwrap().len_days(), 3);
    }

    #[test]
    fn test_time_off_inverted_range_not_expanded() {
        let row = TimeOffRow {
            name: "Ann".into(),
            start_date: "2026-04-12".into(),
            end_date: "2026-04-10".into(),
            ..Default::default()
        };
        let r = row.to_request().unwrap();
        assert!(r.entries.is_empty());
        assert!(r.span().unwrap().is_inverted());
    }

    #[test]
    fn test_time_off_unknown_kind_kept() {
        let row = TimeOffRow {
            email: "ann@example.org".into(),
            kind: "Vacation".into(),
            ..Default::default()
        };
        let r = row.to_request().unwrap();
        assert_eq!(r.kind, RequestKind::Unknown("Vacation".into()));
        assert_eq!(r.submitted_at, DateTime::<Utc>::default());
        assert!(TimeOffRow::default().to_request().is_none());
    }

    #[test]
    fn test_slot_row() {
        let row = SlotRow {
            row_ref: "A12".into(),
            date: "2026-04-04".into(),
            day_part: "Vigil".into(),
            ministry: "Lector".into(),
            role: "First Reading".into(),
            ..Default::default()
        };
        let slot = row.to_slot().unwrap();
        assert_eq!(slot.day_part, DayPart::Vigil);
        assert_eq!(slot.role, "First Reading");
        assert!(!slot.is_preassigned());
    }

    #[test]
    fn test_slot_row_defaults_and_group() {
        let row = SlotRow {
            row_ref: "A13".into(),
            date: "04/05/2026".into(),
            ministry: "Music".into(),
            volunteer_name: "Youth Choir".into(),
            ..Default::default()
        };
        let slot = row.to_slot().unwrap();
        assert_eq!(slot.day_part, DayPart::NonVigil);
        assert_eq!(slot.role, "Music");
        assert_eq!(slot.volunteer.as_ref().unwrap().id, "Youth Choir");
    }

    #[test]
    fn test_slot_row_skipped() {
        let no_date = SlotRow {
            ministry: "Lector".into(),
            ..Default::default()
        };
        let no_ministry = SlotRow {
            date: "2026-04-05".into(),
            ..Default::default()
        };
        assert!(no_date.to_slot().is_none());
        assert!(no_ministry.to_slot().is_none());
    }
}
