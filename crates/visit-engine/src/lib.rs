//! # visit-engine
//!
//! Deterministic schedule resolution for recurring facility visits.
//!
//! Given the full set of schedule records for a contract portfolio, the engine
//! answers "which visits happen on date D?" and supports non-destructive
//! editing of single occurrences inside a recurring series — cancel or replace
//! only one date, truncate from a date onward, or remove the whole series —
//! without corrupting the series definition or losing history.
//!
//! Every query recomputes from the current record set; the engine holds no
//! state between calls, so there is nothing to invalidate after a mutation.
//! Callers re-fetch from their persistence collaborator and resolve again.
//!
//! ## Modules
//!
//! - [`record`] — schedule records, recurrence rules, override links
//! - [`rule`] — pure recurrence-rule firing check
//! - [`index`] — classification into standalone / template / override buckets
//! - [`resolver`] — per-date resolution with override precedence
//! - [`projector`] — bounded "upcoming visits" projection
//! - [`mutator`] — single / this-and-future / whole-series edits
//! - [`store`] — persistence collaborator trait and in-memory implementation
//! - [`error`] — error types

pub mod error;
pub mod index;
pub mod mutator;
pub mod projector;
pub mod record;
pub mod resolver;
pub mod rule;
pub mod store;

pub use error::{Result, ScheduleError};
pub use index::OverrideIndex;
pub use mutator::{
    delete_series, override_occurrence, purge_orphaned, truncate_series, OccurrenceChange,
};
pub use projector::{upcoming, year_end, Occurrence};
pub use record::{
    parse_date, validate_records, OverrideRef, Recurrence, RecurrenceRule, ScheduleRecord, Weekday,
};
pub use resolver::{resolve, resolve_indexed};
pub use rule::fires;
pub use store::{MemoryStore, RecordStore, StoreError};
