use chrono::NaiveDate;
use ministry_schedule::models::{DayPart, SlotOutcome, UnfilledReason};
use ministry_schedule::store::{MemoryStore, SlotRow, TimeOffRow, VolunteerRow};
use ministry_schedule::{run_month, EngineConfig, Error, Feast};

fn volunteer(id: &str, name: &str, status: &str) -> VolunteerRow {
    VolunteerRow {
        id: id.into(),
        name: name.into(),
        email: format!("{}@example.org", id.to_lowercase()),
        status: status.into(),
        skills: "Lector".into(),
    }
}

fn lector_slot(row: &str, date: &str, part: &str) -> SlotRow {
    SlotRow {
        row_ref: row.into(),
        date: date.into(),
        day_part: part.into(),
        ministry: "Lector".into(),
        status: "Unassigned".into(),
        ..Default::default()
    }
}

fn scenario_store() -> MemoryStore {
    MemoryStore::new()
        .with_volunteers(vec![
            volunteer("A", "Volunteer A", "Active"),
            volunteer("B", "Volunteer B", "Active"),
            volunteer("C", "Volunteer C", "Inactive"),
        ])
        .with_time_off(vec![TimeOffRow {
            id: "T1".into(),
            name: "Volunteer B".into(),
            email: "b@example.org".into(),
            kind: "Unavailable".into(),
            status: "Approved".into(),
            submitted_at: "2026-03-20T10:00:00Z".into(),
            dates: "2026-04-05 NonVigil".into(),
            ..Default::default()
        }])
        .with_slots(
            2026,
            4,
            vec![
                lector_slot("S1", "2026-04-05", "NonVigil"),
                lector_slot("S2", "2026-04-05", "NonVigil"),
                lector_slot("S3", "2026-04-05", "NonVigil"),
            ],
        )
}

#[test]
fn test_three_lector_slots_one_eligible_volunteer() {
    let mut store = scenario_store();
    let report = run_month(&mut store, &EngineConfig::default(), 2026, 4).unwrap();

    let s1 = report.result.decision_for("S1").unwrap();
    assert_eq!(s1.outcome.volunteer().map(|v| v.id.as_str()), Some("A"));
    assert_eq!(report.result.summary.filled, 1);
    assert_eq!(report.result.open_count(UnfilledReason::NoQualifiedVolunteer), 2);
    for id in ["S2", "S3"] {
        assert_eq!(
            report.result.decision_for(id).unwrap().outcome,
            SlotOutcome::Unfilled(UnfilledReason::NoQualifiedVolunteer)
        );
    }

    assert_eq!(report.written, 1);
    let rows = store.slots(2026, 4).unwrap();
    assert_eq!(rows[0].volunteer_id, "A");
    assert_eq!(rows[0].status, "Assigned");
    assert!(rows[1].volunteer_id.is_empty());
}

#[test]
fn test_rerun_is_identical() {
    let first = run_month(&mut scenario_store(), &EngineConfig::default(), 2026, 4).unwrap();
    let second = run_month(&mut scenario_store(), &EngineConfig::default(), 2026, 4).unwrap();
    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
}

#[test]
fn test_second_run_keeps_first_assignments() {
    let mut store = scenario_store();
    run_month(&mut store, &EngineConfig::default(), 2026, 4).unwrap();
    let again = run_month(&mut store, &EngineConfig::default(), 2026, 4).unwrap();

    assert_eq!(again.result.summary.preassigned, 1);
    assert_eq!(again.result.summary.filled, 0);
    assert_eq!(again.written, 0);
}

#[test]
fn test_last_day_vigil_and_spillover() {
    let mut store = MemoryStore::new()
        .with_volunteers(vec![volunteer("A", "Ann", ""), volunteer("B", "Ben", "")])
        .with_time_off(vec![
            TimeOffRow {
                id: "T1".into(),
                name: "Ann".into(),
                kind: "Unavailable".into(),
                status: "Approved".into(),
                dates: "2026-04-30 18:00 Vigil, 2026-05-31 (Vigil)".into(),
                ..Default::default()
            },
            TimeOffRow {
                id: "T2".into(),
                name: "Ben".into(),
                kind: "Unavailable".into(),
                status: "Pending".into(),
                dates: "2026-05-31 Vigil".into(),
                ..Default::default()
            },
        ])
        .with_slots(
            2026,
            5,
            vec![
                lector_slot("S1", "2026-04-30", "Vigil"),
                lector_slot("S2", "2026-05-31", "Vigil"),
            ],
        );

    let report = run_month(&mut store, &EngineConfig::default(), 2026, 5).unwrap();
    assert_eq!(report.time_off.via_spillover, 1);
    assert_eq!(report.time_off.not_approved, 1);

    for id in ["S1", "S2"] {
        let d = report.result.decision_for(id).unwrap();
        assert_eq!(d.day_part, DayPart::Vigil);
        assert_eq!(d.outcome.volunteer().map(|v| v.id.as_str()), Some("B"));
    }
}

#[test]
fn test_exclusive_availability_through_store() {
    let mut store = MemoryStore::new()
        .with_volunteers(vec![volunteer("A", "Ann", "")])
        .with_time_off(vec![TimeOffRow {
            id: "T1".into(),
            // typed name differs; joined through email
            name: "Annie".into(),
            email: "A@example.org".into(),
            kind: "Only Available".into(),
            status: "Approved".into(),
            dates: "2026-04-12 NonVigil".into(),
            ..Default::default()
        }])
        .with_slots(
            2026,
            4,
            vec![
                lector_slot("S1", "2026-04-05", ""),
                lector_slot("S2", "2026-04-12", ""),
                lector_slot("S3", "2026-04-11", "Vigil"),
            ],
        );

    let report = run_month(&mut store, &EngineConfig::default(), 2026, 4).unwrap();
    assert_eq!(report.load.rekeyed_requests, 1);
    assert_eq!(report.result.assignments_for_volunteer("A").len(), 1);
    assert_eq!(
        report.result.decision_for("S2").unwrap().date,
        NaiveDate::from_ymd_opt(2026, 4, 12).unwrap()
    );
    assert_eq!(report.result.open_count(UnfilledReason::AllUnavailable), 2);
}

#[test]
fn test_feasts_follow_config() {
    let mut store = MemoryStore::new()
        .with_volunteers(vec![])
        .with_slots(2026, 5, vec![]);
    let config = EngineConfig::from_toml_str("[liturgical]\ntransfer_ascension = true").unwrap();

    let report = run_month(&mut store, &config, 2026, 5).unwrap();
    let ascension = report
        .feasts
        .iter()
        .find(|(f, _)| *f == Feast::Ascension)
        .map(|&(_, d)| d);
    // Easter 2026-04-05, +42 days
    assert_eq!(ascension, NaiveDate::from_ymd_opt(2026, 5, 17));
}

#[test]
fn test_missing_assignments_table_aborts() {
    let mut store = MemoryStore::new().with_volunteers(vec![volunteer("A", "Ann", "")]);
    let err = run_month(&mut store, &EngineConfig::default(), 2026, 4).unwrap_err();
    assert!(matches!(err, Error::MissingTable { .. }));
    assert_eq!(store.write_batches(), 0);
}

#[test]
fn test_name_only_preassigned_blocks_same_mass() {
    let mut store = MemoryStore::new()
        .with_volunteers(vec![volunteer("V1", "Ann", "Active"), volunteer("V2", "Ben", "Active")])
        .with_slots(
            2026,
            4,
            vec![
                SlotRow {
                    volunteer_name: "Ann".into(),
                    ..lector_slot("S1", "2026-04-05", "NonVigil")
                },
                lector_slot("S2", "2026-04-05", "NonVigil"),
            ],
        );

    let report = run_month(&mut store, &EngineConfig::default(), 2026, 4).unwrap();
    let s1 = report.result.decision_for("S1").unwrap();
    assert!(matches!(&s1.outcome, SlotOutcome::Preassigned(v) if v.id == "V1"));
    let s2 = report.result.decision_for("S2").unwrap();
    assert_eq!(s2.outcome.volunteer().map(|v| v.id.as_str()), Some("V2"));
    assert_eq!(report.kpi.load_by_volunteer.get("V1"), Some(&1));
    assert_eq!(report.kpi.load_by_volunteer.get("V2"), Some(&1));
}
