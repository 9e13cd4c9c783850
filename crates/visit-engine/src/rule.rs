//! Pure recurrence-rule firing check.

use chrono::NaiveDate;

use crate::record::{Recurrence, RecurrenceRule};

/// Whether `rule` fires on `date`.
///
/// True iff `date` lies inside `[start_date, end_date]` (unbounded when
/// `end_date` is absent) and is a whole multiple of the interval away from
/// the start. Subtraction is whole calendar days; time-of-day and DST never
/// enter into it.
///
/// Pure and infallible — malformed rules are rejected at intake by
/// [`RecurrenceRule::validate`], and the reserved calendar variants never
/// fire here.
pub fn fires(date: NaiveDate, rule: &RecurrenceRule) -> bool {
    if date < rule.start_date {
        return false;
    }
    if let Some(end) = rule.end_date {
        if date > end {
            return false;
        }
    }
    match rule.recurrence {
        Recurrence::DayInterval { interval } if interval > 0 => {
            (date - rule.start_date).num_days() % i64::from(interval) == 0
        }
        _ => false,
    }
}
