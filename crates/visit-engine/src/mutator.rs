//! Record-level mutations behind the three series-edit intents.
//!
//! Every operation is terminal: it writes through the [`RecordStore`] and
//! returns nothing but success or failure. The caller re-fetches the record
//! set before the next resolution; the mutator never maintains an in-memory
//! view of its own.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{Result, ScheduleError};
use crate::index::OverrideIndex;
use crate::record::{OverrideRef, ScheduleRecord};
use crate::store::{RecordStore, StoreError};

/// What a single-occurrence edit does to its date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccurrenceChange {
    /// Suppress the visit entirely.
    Cancel,
    /// Substitute new field values for the visit. `None` keeps the
    /// template's value.
    Replace {
        time: Option<String>,
        notes: Option<String>,
    },
}

/// Edit or cancel only one date of a series.
///
/// Creates a single override record carrying the template's contract fields
/// and an explicit [`OverrideRef`] back to the (template, date) it covers.
/// The template itself is never touched. A second override for the same
/// (contract, date) key is rejected with
/// [`ScheduleError::DuplicateOverride`] — re-editing an already overridden
/// date means editing that override record, not stacking another.
///
/// If the originating template is missing from the record set (stale caller
/// snapshot, external deletion), the target record is deleted directly
/// instead of failing the user's action; the inconsistency is logged.
pub fn override_occurrence(
    store: &mut dyn RecordStore,
    records: &[ScheduleRecord],
    template_id: &str,
    date: NaiveDate,
    change: OccurrenceChange,
) -> Result<()> {
    let Some(template) = records.iter().find(|r| r.id == template_id) else {
        warn!(template_id, %date, "originating template not found, deleting record directly");
        return delete_tolerating_missing(store, template_id);
    };

    let index = OverrideIndex::build(records);
    if index.override_for(&template.contract_id, date).is_some() {
        return Err(ScheduleError::DuplicateOverride {
            contract_id: template.contract_id.clone(),
            date,
        });
    }

    let (active, time, notes) = match change {
        OccurrenceChange::Cancel => (false, template.time.clone(), String::new()),
        OccurrenceChange::Replace { time, notes } => (
            true,
            time.unwrap_or_else(|| template.time.clone()),
            notes.unwrap_or_default(),
        ),
    };

    store.create(ScheduleRecord {
        id: format!("{}@{}", template_id, date),
        contract_id: template.contract_id.clone(),
        contract_name: template.contract_name.clone(),
        address: template.address.clone(),
        weekday: None,
        time,
        notes,
        active,
        recurrence_rule: None,
        override_of: Some(OverrideRef {
            template_id: template_id.to_string(),
            date,
        }),
    })?;
    Ok(())
}

/// Edit or cancel this and all future dates.
///
/// Truncates the series by setting the rule's `end_date` to the day before
/// `from_date`; occurrences strictly before `from_date` are unaffected. When
/// nothing of the series would remain (truncation at or before the rule's
/// start), the template is deleted outright, which keeps the
/// `start_date <= end_date` invariant. A template with no rule is
/// inconsistent state and degrades to direct deletion, logged.
pub fn truncate_series(
    store: &mut dyn RecordStore,
    records: &[ScheduleRecord],
    template_id: &str,
    from_date: NaiveDate,
) -> Result<()> {
    let Some(template) = records.iter().find(|r| r.id == template_id) else {
        return Err(ScheduleError::TemplateNotFound(template_id.to_string()));
    };
    let Some(rule) = &template.recurrence_rule else {
        warn!(template_id, "record has no recurrence rule, deleting instead of truncating");
        store.delete(template_id)?;
        return Ok(());
    };

    match from_date.pred_opt() {
        Some(new_end) if new_end >= rule.start_date => {
            let mut updated = template.clone();
            if let Some(rule) = updated.recurrence_rule.as_mut() {
                rule.end_date = Some(new_end);
            }
            store.update(updated)?;
        }
        _ => {
            store.delete(template_id)?;
        }
    }
    Ok(())
}

/// Delete the entire series.
///
/// Removes the template record only. Overrides pointing at it are left in
/// place and keep the history of cancelled/edited dates readable; cleaning
/// them up is the explicit [`purge_orphaned`] sweep, never an implicit
/// cascade.
pub fn delete_series(store: &mut dyn RecordStore, template_id: &str) -> Result<()> {
    store.delete(template_id)?;
    Ok(())
}

/// Maintenance sweep over override records ("clear cancelled items").
///
/// Deletes cancellation overrides and replacement overrides whose
/// originating template no longer exists. Returns the number of records
/// deleted. Purging a cancellation whose template is still live re-enables
/// that date's firing — this sweep runs on explicit user action only.
pub fn purge_orphaned(store: &mut dyn RecordStore, records: &[ScheduleRecord]) -> Result<usize> {
    let index = OverrideIndex::build(records);
    let template_ids: HashSet<&str> = index.templates().iter().map(|r| r.id.as_str()).collect();

    let mut purged = 0;
    for (_, record) in index.overrides() {
        let orphaned = record
            .override_of
            .as_ref()
            .is_some_and(|link| !template_ids.contains(link.template_id.as_str()));
        if !record.active || orphaned {
            store.delete(&record.id)?;
            purged += 1;
        }
    }
    Ok(purged)
}

/// Delete where the record may already be gone; only real backend failures
/// propagate.
fn delete_tolerating_missing(store: &mut dyn RecordStore, id: &str) -> Result<()> {
    match store.delete(id) {
        Ok(()) | Err(StoreError::NotFound(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
