//! Error types for visit-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A boundary date string did not parse as `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A recurrence rule with a zero-day interval would fire on every date.
    #[error("recurrence interval must be at least 1 day")]
    ZeroInterval,

    #[error("recurrence end date {end} precedes start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    /// The recurrence variant is reserved in the schema but not implemented.
    /// Rejected at validation so it can never silently mis-fire.
    #[error("unsupported recurrence variant '{0}'")]
    UnsupportedRecurrence(&'static str),

    /// A second override for the same (contract, date) key was rejected at
    /// write time; resolution precedence among duplicates would be undefined.
    #[error("an override already exists for contract {contract_id} on {date}")]
    DuplicateOverride {
        contract_id: String,
        date: NaiveDate,
    },

    #[error("no template with id '{0}' in the record set")]
    TemplateNotFound(String),

    /// A persistence call failed. The engine performs no retry; the caller
    /// must re-fetch to learn the actual stored state.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
