//! Schedule records and recurrence rules.
//!
//! A [`ScheduleRecord`] is the only persisted entity the engine operates on.
//! Depending on its fields it plays exactly one of three roles:
//!
//! - **standalone** — no rule, no override link; fires on a fixed weekday
//! - **template** — carries a [`RecurrenceRule`]; generates many occurrences
//! - **override** — linked to one (contract, date); replaces or cancels the
//!   visit that would otherwise resolve there
//!
//! Records serialize in camelCase to round-trip the backing service's JSON
//! shape unchanged.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Date format used at every engine boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a boundary date string (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ScheduleError::InvalidDate(s.to_string()))
}

/// Weekday names as stored on standalone records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    fn as_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }

    /// Whether `date` falls on this weekday.
    pub fn matches(self, date: NaiveDate) -> bool {
        date.weekday() == self.as_chrono()
    }
}

/// Recurrence vocabulary.
///
/// Producers only ever emit day-based intervals — weekly, biweekly, and
/// "monthly" arrive as interval 7 / 14 / 30. The calendar-anchored variants
/// are reserved in the schema; [`RecurrenceRule::validate`] rejects them so
/// they can never silently mis-fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Recurrence {
    DayInterval { interval: u32 },
    CalendarWeekly,
    CalendarMonthly,
}

/// A recurrence rule: fire every `interval` days counted from `start_date`,
/// up to an optional inclusive `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(flatten)]
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Build a validated day-interval rule.
    pub fn day_interval(
        interval: u32,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let rule = Self {
            recurrence: Recurrence::DayInterval { interval },
            start_date,
            end_date,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Reject rules the evaluator cannot fire correctly.
    ///
    /// Callers validate at intake (deserialization does not); a rule that
    /// passes here is safe to hand to [`crate::rule::fires`].
    pub fn validate(&self) -> Result<()> {
        match self.recurrence {
            Recurrence::DayInterval { interval: 0 } => return Err(ScheduleError::ZeroInterval),
            Recurrence::DayInterval { .. } => {}
            Recurrence::CalendarWeekly => {
                return Err(ScheduleError::UnsupportedRecurrence("calendar-weekly"))
            }
            Recurrence::CalendarMonthly => {
                return Err(ScheduleError::UnsupportedRecurrence("calendar-monthly"))
            }
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ScheduleError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Explicit link from an override record to the template occurrence it
/// replaces or cancels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRef {
    pub template_id: String,
    pub date: NaiveDate,
}

/// One persisted schedule record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: String,
    /// Denormalized contract reference; opaque display data to the engine.
    pub contract_id: String,
    pub contract_name: String,
    pub address: String,
    /// Fixed weekday for standalone records. Ignored when a rule is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<Weekday>,
    /// Local time-of-day display string ("HH:MM").
    pub time: String,
    /// Free text. Legacy override records embedded the target date here.
    #[serde(default)]
    pub notes: String,
    /// `false` on a non-recurring override marks a cancellation.
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_of: Option<OverrideRef>,
}

impl ScheduleRecord {
    pub fn is_template(&self) -> bool {
        self.recurrence_rule.is_some()
    }

    /// The date this record overrides, if it is an override at all.
    ///
    /// Prefers the explicit `override_of` link. Records written before the
    /// link existed embedded the target date in `id` or `notes`; those
    /// markers are still honored so old data round-trips unchanged. Rule
    /// presence wins: a template is never an override, whatever its notes
    /// happen to contain.
    pub fn override_date(&self) -> Option<NaiveDate> {
        if self.recurrence_rule.is_some() {
            return None;
        }
        if let Some(link) = &self.override_of {
            return Some(link.date);
        }
        find_embedded_date(&self.id).or_else(|| find_embedded_date(&self.notes))
    }

    /// Validate the record's rule, if present.
    pub fn validate(&self) -> Result<()> {
        if let Some(rule) = &self.recurrence_rule {
            rule.validate()?;
        }
        Ok(())
    }
}

/// Validate every record in a freshly fetched set. Intake gate for rule
/// malformations the resolver would otherwise propagate silently.
pub fn validate_records(records: &[ScheduleRecord]) -> Result<()> {
    for record in records {
        record.validate()?;
    }
    Ok(())
}

/// Scan a string for an embedded `YYYY-MM-DD` date (legacy override marker).
fn find_embedded_date(s: &str) -> Option<NaiveDate> {
    if s.len() < 10 {
        return None;
    }
    for i in 0..=s.len() - 10 {
        let Some(window) = s.get(i..i + 10) else {
            continue;
        };
        let b = window.as_bytes();
        if b[4] == b'-' && b[7] == b'-' {
            if let Ok(date) = NaiveDate::parse_from_str(window, DATE_FORMAT) {
                return Some(date);
            }
        }
    }
    None
}
