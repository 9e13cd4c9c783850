//! Classification of the raw record set.
//!
//! One O(n) pass splits every record into exactly one of three buckets:
//! standalone, template, or date-keyed override. Rule presence wins over an
//! override marker, and a marker wins over the weekday field, so the split is
//! total and non-overlapping. No I/O; the index borrows the record slice and
//! is rebuilt from scratch on every query path.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::record::ScheduleRecord;

/// The record set split by role, with keyed override lookups.
#[derive(Debug, Default)]
pub struct OverrideIndex<'a> {
    standalone: Vec<&'a ScheduleRecord>,
    templates: Vec<&'a ScheduleRecord>,
    /// Overrides in input order; backs the resolver's stable-order guarantee.
    overrides: Vec<(NaiveDate, &'a ScheduleRecord)>,
    by_key: HashMap<(&'a str, NaiveDate), Vec<&'a ScheduleRecord>>,
}

impl<'a> OverrideIndex<'a> {
    /// Build the index from the full record set.
    pub fn build(records: &'a [ScheduleRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            if record.is_template() {
                index.templates.push(record);
            } else if let Some(date) = record.override_date() {
                index.overrides.push((date, record));
                index
                    .by_key
                    .entry((record.contract_id.as_str(), date))
                    .or_default()
                    .push(record);
            } else {
                index.standalone.push(record);
            }
        }
        index
    }

    /// Non-recurring weekday records, in input order.
    pub fn standalone(&self) -> &[&'a ScheduleRecord] {
        &self.standalone
    }

    /// Rule-bearing records, in input order.
    pub fn templates(&self) -> &[&'a ScheduleRecord] {
        &self.templates
    }

    /// All override records with their target dates, in input order.
    pub fn overrides(&self) -> impl Iterator<Item = (NaiveDate, &'a ScheduleRecord)> + '_ {
        self.overrides.iter().copied()
    }

    /// Replacement overrides (active, any contract) targeting `date`,
    /// in input order.
    pub fn replacements_on(&self, date: NaiveDate) -> Vec<&'a ScheduleRecord> {
        self.overrides
            .iter()
            .filter(|(d, record)| *d == date && record.active)
            .map(|(_, record)| *record)
            .collect()
    }

    /// First override registered for the (contract, date) key, active or not.
    ///
    /// Among duplicates the first encountered wins; write-time uniqueness
    /// keeps duplicates out of new data.
    pub fn override_for(&self, contract_id: &str, date: NaiveDate) -> Option<&'a ScheduleRecord> {
        self.by_key
            .get(&(contract_id, date))
            .and_then(|records| records.first().copied())
    }

    /// Whether a cancellation suppresses this contract on this date.
    pub fn has_cancellation(&self, contract_id: &str, date: NaiveDate) -> bool {
        self.by_key
            .get(&(contract_id, date))
            .is_some_and(|records| records.iter().any(|r| !r.active))
    }

    /// Whether a replacement already covers this contract on this date.
    pub fn has_replacement(&self, contract_id: &str, date: NaiveDate) -> bool {
        self.by_key
            .get(&(contract_id, date))
            .is_some_and(|records| records.iter().any(|r| r.active))
    }

    /// Bucket sizes: (standalone, templates, overrides). Every input record
    /// is counted exactly once.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.standalone.len(),
            self.templates.len(),
            self.overrides.len(),
        )
    }
}
