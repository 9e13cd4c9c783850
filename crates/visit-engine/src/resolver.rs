//! Per-date occurrence resolution.
//!
//! Precedence, first match wins per contract:
//!
//! 1. Any replacement override targeting the date is a full, authoritative
//!    substitute — once one exists, standalone and recurring sources are
//!    suppressed entirely for that date.
//! 2. Otherwise, standalone records whose weekday matches and that are not
//!    cancelled for their contract on that date.
//! 3. Plus templates whose rule fires, minus any template cancelled or
//!    already replaced for that contract/date.
//!
//! Resolution is idempotent and side-effect-free: the same record set always
//! yields the same, stably-ordered result.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::index::OverrideIndex;
use crate::record::ScheduleRecord;
use crate::rule;

/// Resolve the effective visits for one calendar date.
///
/// Recomputes the classification from the full record set on every call.
pub fn resolve(date: NaiveDate, records: &[ScheduleRecord]) -> Vec<&ScheduleRecord> {
    resolve_indexed(date, &OverrideIndex::build(records))
}

/// Resolve against a pre-built index. The projector reuses one index across
/// an entire horizon scan instead of rebuilding it per day.
pub fn resolve_indexed<'a>(date: NaiveDate, index: &OverrideIndex<'a>) -> Vec<&'a ScheduleRecord> {
    // Replacements substitute for the whole date, not add to it.
    let replacements = index.replacements_on(date);
    if !replacements.is_empty() {
        return dedup_by_id(replacements);
    }

    let mut visits: Vec<&ScheduleRecord> = Vec::new();

    for &record in index.standalone() {
        if record.active
            && record.weekday.is_some_and(|w| w.matches(date))
            && !index.has_cancellation(&record.contract_id, date)
        {
            visits.push(record);
        }
    }

    for &record in index.templates() {
        let Some(rule) = &record.recurrence_rule else {
            continue;
        };
        // has_replacement is a guard only: a live replacement already
        // short-circuited above.
        if rule::fires(date, rule)
            && !index.has_cancellation(&record.contract_id, date)
            && !index.has_replacement(&record.contract_id, date)
        {
            visits.push(record);
        }
    }

    dedup_by_id(visits)
}

/// Deduplicate by record id, keeping first occurrences in order.
fn dedup_by_id(visits: Vec<&ScheduleRecord>) -> Vec<&ScheduleRecord> {
    let mut seen = HashSet::new();
    visits
        .into_iter()
        .filter(|record| seen.insert(record.id.as_str()))
        .collect()
}
