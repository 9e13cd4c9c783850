//! Bounded "upcoming visits" projection.
//!
//! Walks the horizon day by day, resolving each date and flattening the
//! results. Deliberately O(days × records): the horizon is capped at roughly
//! a year and record sets are small. Re-index by weekday/date before scaling
//! this to multi-year horizons or thousands of records.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::index::OverrideIndex;
use crate::record::ScheduleRecord;
use crate::resolver;

/// One resolved (date, record) pair. Never persisted; its identity exists
/// only for UI keying.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence<'a> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub record: &'a ScheduleRecord,
}

impl Occurrence<'_> {
    /// Synthetic identity: originating record id plus the date.
    pub fn occurrence_id(&self) -> String {
        format!("{}@{}", self.record.id, self.date)
    }
}

/// December 31 of `from`'s year — the default projection horizon. A schedule
/// never silently projects into an unreviewed future year.
pub fn year_end(from: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(from.year(), 12, 31).expect("Dec 31 exists in every year")
}

/// Project all occurrences in `[from, to]`, both bounds inclusive.
///
/// Output is sorted ascending by date, then by time-of-day. Dates past `to`
/// never appear, even for unbounded rules; the bound is the projector's
/// concern, not the resolver's.
pub fn upcoming<'a>(
    records: &'a [ScheduleRecord],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Occurrence<'a>> {
    let index = OverrideIndex::build(records);
    let mut out = Vec::new();

    let mut day = from;
    while day <= to {
        for record in resolver::resolve_indexed(day, &index) {
            out.push(Occurrence { date: day, record });
        }
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }

    out.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.record.time.cmp(&b.record.time))
    });
    out
}
