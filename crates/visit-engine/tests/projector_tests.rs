//! Tests for the bounded "upcoming visits" projection.

use chrono::NaiveDate;
use visit_engine::{upcoming, year_end, OverrideRef, RecurrenceRule, ScheduleRecord, Weekday};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

fn template(id: &str, contract: &str, time: &str, interval: u32, start: NaiveDate) -> ScheduleRecord {
    ScheduleRecord {
        id: id.to_string(),
        contract_id: contract.to_string(),
        contract_name: format!("Contract {contract}"),
        address: "1 Plant Way".to_string(),
        weekday: None,
        time: time.to_string(),
        notes: String::new(),
        active: true,
        recurrence_rule: Some(
            RecurrenceRule::day_interval(interval, start, None).expect("valid rule"),
        ),
        override_of: None,
    }
}

// ---------------------------------------------------------------------------
// Horizon bound
// ---------------------------------------------------------------------------

#[test]
fn projection_never_passes_the_horizon() {
    // Unbounded weekly rule, projected only to year end.
    let records = vec![template("t1", "c1", "09:00", 7, d(2025, 1, 6))];
    let from = d(2025, 11, 1);
    let to = year_end(from);

    let occurrences = upcoming(&records, from, to);
    assert!(!occurrences.is_empty());
    assert!(
        occurrences.iter().all(|o| o.date >= from && o.date <= to),
        "all occurrences must stay inside [from, to]"
    );
    // Last Monday of 2025 is Dec 29.
    assert_eq!(occurrences.last().expect("non-empty").date, d(2025, 12, 29));
}

#[test]
fn year_end_is_december_31_of_the_from_year() {
    assert_eq!(year_end(d(2025, 3, 14)), d(2025, 12, 31));
    assert_eq!(year_end(d(2025, 12, 31)), d(2025, 12, 31));
    assert_eq!(year_end(d(2026, 1, 1)), d(2026, 12, 31));
}

#[test]
fn bounds_are_inclusive_on_both_ends() {
    let records = vec![template("t1", "c1", "09:00", 7, d(2025, 1, 6))];

    // Single-day horizon landing exactly on a firing date.
    let occurrences = upcoming(&records, d(2025, 1, 13), d(2025, 1, 13));
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].date, d(2025, 1, 13));
}

#[test]
fn inverted_range_projects_nothing() {
    let records = vec![template("t1", "c1", "09:00", 7, d(2025, 1, 6))];
    assert!(upcoming(&records, d(2025, 2, 1), d(2025, 1, 1)).is_empty());
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn occurrences_sorted_by_date_then_time() {
    let records = vec![
        template("late", "c1", "14:00", 7, d(2025, 1, 6)),
        template("early", "c2", "08:30", 7, d(2025, 1, 6)),
        template("midweek", "c3", "10:00", 7, d(2025, 1, 9)),
    ];

    let occurrences = upcoming(&records, d(2025, 1, 6), d(2025, 1, 12));
    let keys: Vec<(NaiveDate, String)> = occurrences
        .iter()
        .map(|o| (o.date, o.record.time.clone()))
        .collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "projection must come out (date, time)-sorted");

    // Same day: 08:30 visit precedes 14:00 visit.
    assert_eq!(occurrences[0].record.id, "early");
    assert_eq!(occurrences[1].record.id, "late");
    assert_eq!(occurrences[2].record.id, "midweek");
}

// ---------------------------------------------------------------------------
// Overrides inside the horizon
// ---------------------------------------------------------------------------

#[test]
fn cancelled_date_is_skipped_mid_horizon() {
    let t = template("t1", "c1", "09:00", 7, d(2025, 1, 6));
    let cancel = ScheduleRecord {
        id: "t1@2025-01-13".to_string(),
        contract_id: "c1".to_string(),
        contract_name: "Contract c1".to_string(),
        address: "1 Plant Way".to_string(),
        weekday: None,
        time: "09:00".to_string(),
        notes: String::new(),
        active: false,
        recurrence_rule: None,
        override_of: Some(OverrideRef {
            template_id: "t1".to_string(),
            date: d(2025, 1, 13),
        }),
    };
    let records = vec![t, cancel];

    let occurrences = upcoming(&records, d(2025, 1, 6), d(2025, 1, 27));
    let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![d(2025, 1, 6), d(2025, 1, 20), d(2025, 1, 27)],
        "the cancelled Monday must be absent"
    );
}

#[test]
fn standalone_weekday_projects_every_matching_day() {
    let records = vec![ScheduleRecord {
        id: "s1".to_string(),
        contract_id: "c1".to_string(),
        contract_name: "Contract c1".to_string(),
        address: "1 Plant Way".to_string(),
        weekday: Some(Weekday::Friday),
        time: "11:00".to_string(),
        notes: String::new(),
        active: true,
        recurrence_rule: None,
        override_of: None,
    }];

    let occurrences = upcoming(&records, d(2025, 1, 1), d(2025, 1, 31));
    let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![d(2025, 1, 3), d(2025, 1, 10), d(2025, 1, 17), d(2025, 1, 24), d(2025, 1, 31)]
    );
}

// ---------------------------------------------------------------------------
// Occurrence identity
// ---------------------------------------------------------------------------

#[test]
fn occurrence_id_concatenates_record_id_and_date() {
    let records = vec![template("t1", "c1", "09:00", 7, d(2025, 1, 6))];
    let occurrences = upcoming(&records, d(2025, 1, 13), d(2025, 1, 13));
    assert_eq!(occurrences[0].occurrence_id(), "t1@2025-01-13");
}
