//! Read-once run context and the month pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

use super::{tables, AssignmentWrite, RowStore};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::liturgical::{compute_liturgical_dates, Feast};
use crate::models::{AssignmentResult, MonthWindow, RoleSlot, TimeOffRequest, VolunteerPool};
use crate::scheduler::{ResolveKpi, Resolver};
use crate::time_off::{build_time_off_index, IndexStats};

/// Rows dropped or adjusted while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Volunteer rows that could not be converted.
    pub skipped_volunteers: usize,
    /// Time-off rows that could not be converted.
    pub skipped_requests: usize,
    /// Slot rows that could not be converted.
    pub skipped_slots: usize,
    /// Requests whose typed name was replaced by the roster name matched
    /// through their email.
    pub rekeyed_requests: usize,
    /// Preassigned slots whose volunteer reference was replaced by the
    /// roster id and name it matched.
    pub rekeyed_slots: usize,
    /// Whether the time-off table was absent.
    pub time_off_missing: bool,
}

/// Everything one month run reads, loaded once.
///
/// Each run builds its own context; nothing is cached between runs.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Target month.
    pub window: MonthWindow,
    /// Volunteer roster.
    pub pool: VolunteerPool,
    /// All time-off requests, keyed to roster names where possible.
    pub requests: Vec<TimeOffRequest>,
    /// The month's role-slots, in table order.
    pub slots: Vec<RoleSlot>,
    /// Loading counters.
    pub stats: LoadStats,
}

impl RunContext {
    /// Reads every table the run needs.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMonth`] / [`Error::InvalidYear`] for a bad target.
    /// - [`Error::MissingTable`] when the volunteers or role-slot table is
    ///   absent.
    /// - Any error the store reports.
    #[instrument(level = "debug", skip(store))]
    pub fn load<S: RowStore + ?Sized>(store: &S, year: i32, month: u32) -> Result<Self> {
        let window = MonthWindow::new(year, month)?;
        let missing = |table: &'static str| Error::MissingTable { table, year, month };
        let mut stats = LoadStats::default();

        let volunteer_rows = store
            .read_volunteers()?
            .ok_or_else(|| missing(tables::VOLUNTEERS))?;
        let slot_rows = store
            .read_role_slots(year, month)?
            .ok_or_else(|| missing(tables::ROLE_SLOTS))?;
        let time_off_rows = match store.read_time_off()? {
            Some(rows) => rows,
            None => {
                tracing::warn!(table = tables::TIME_OFF, "table missing, no time-off applied");
                stats.time_off_missing = true;
                Vec::new()
            }
        };

        let volunteers: Vec<_> = volunteer_rows.iter().filter_map(|r| r.to_volunteer()).collect();
        stats.skipped_volunteers = volunteer_rows.len() - volunteers.len();
        let pool = VolunteerPool::new(volunteers);

        let mut slots: Vec<_> = slot_rows.iter().filter_map(|r| r.to_slot()).collect();
        stats.skipped_slots = slot_rows.len() - slots.len();
        for slot in &mut slots {
            let Some(assigned) = slot.volunteer.as_mut() else {
                continue;
            };
            match pool.lookup(&assigned.id, &assigned.name) {
                Some(v) if v.id != assigned.id || v.name != assigned.name => {
                    tracing::debug!(
                        slot = %slot.id,
                        written = %assigned.id,
                        roster = %v.id,
                        "preassigned volunteer matched to roster"
                    );
                    assigned.id = v.id.clone();
                    assigned.name = v.name.clone();
                    stats.rekeyed_slots += 1;
                }
                Some(_) => {}
                None => {
                    tracing::warn!(
                        slot = %slot.id,
                        volunteer = %assigned.name,
                        "preassigned volunteer not on the roster"
                    );
                }
            }
        }

        let mut requests: Vec<_> = time_off_rows.iter().filter_map(|r| r.to_request()).collect();
        stats.skipped_requests = time_off_rows.len() - requests.len();
        for request in &mut requests {
            if pool.by_name(&request.volunteer_name).is_some() {
                continue;
            }
            match pool.by_email(&request.email) {
                Some(v) => {
                    tracing::debug!(
                        request = %request.id,
                        typed = %request.volunteer_name,
                        roster = %v.name,
                        "time-off name matched through email"
                    );
                    request.volunteer_name = v.name.clone();
                    stats.rekeyed_requests += 1;
                }
                None if request.is_approved() => {
                    tracing::warn!(
                        request = %request.id,
                        name = %request.volunteer_name,
                        "approved time-off for a name not on the roster"
                    );
                }
                None => {}
            }
        }

        tracing::debug!(
            volunteers = pool.len(),
            slots = slots.len(),
            requests = requests.len(),
            "run context loaded"
        );

        Ok(Self {
            window,
            pool,
            requests,
            slots,
            stats,
        })
    }

    /// Slot dates outside the month window.
    ///
    /// These belong to the month's generated schedule (a vigil on the last
    /// day of the previous month, a mass dated the 1st of the next) and are
    /// passed to the time-off index as spillover.
    pub fn spillover_dates(&self) -> BTreeSet<NaiveDate> {
        self.slots
            .iter()
            .map(|s| s.date)
            .filter(|d| !self.window.contains_date(*d))
            .collect()
    }
}

/// Outcome of one month run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    /// Calendar year.
    pub year: i32,
    /// Month number (1-12).
    pub month: u32,
    /// Feasts falling in the month, ordered by date.
    pub feasts: Vec<(Feast, NaiveDate)>,
    /// Loading counters.
    pub load: LoadStats,
    /// Time-off index counters.
    pub time_off: IndexStats,
    /// Per-slot decisions and summary.
    pub result: AssignmentResult,
    /// Coverage and load balance.
    pub kpi: ResolveKpi,
    /// Slot updates written back.
    pub written: usize,
}

/// Resolves one month end to end.
///
/// Reads all tables once, builds the time-off index with the slots' own
/// out-of-month dates as spillover, resolves, and writes every newly
/// filled slot in one batch.
///
/// # Errors
///
/// See [`RunContext::load`]; additionally any error the store reports when
/// writing.
#[instrument(skip(store, config))]
pub fn run_month<S: RowStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    year: i32,
    month: u32,
) -> Result<MonthReport> {
    let context = RunContext::load(&*store, year, month)?;

    let feasts = compute_liturgical_dates(year, &config.liturgical)?.in_month(month);
    let spillover = context.spillover_dates();
    let build = build_time_off_index(&context.requests, year, month, &spillover)?;

    let resolver = Resolver::new().with_policy(config.resolver.policy);
    let result = resolver.resolve(&context.slots, &context.pool, &build.index, &config.skills);

    let writes: Vec<AssignmentWrite> = result
        .decisions
        .iter()
        .filter_map(AssignmentWrite::from_decision)
        .collect();
    if !writes.is_empty() {
        store.write_assignments(&writes)?;
    }

    tracing::info!(
        year,
        month,
        filled = result.summary.filled,
        open = result.summary.open,
        written = writes.len(),
        "month resolved"
    );

    Ok(MonthReport {
        year,
        month,
        feasts,
        load: context.stats,
        time_off: build.stats,
        kpi: ResolveKpi::calculate(&result),
        result,
        written: writes.len(),
    })
}
