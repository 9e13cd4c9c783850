//! `visits` CLI — resolve, project, and edit visit schedules from the
//! command line.
//!
//! The record file plays the role of the persistence collaborator: every
//! subcommand loads it fresh, and mutating subcommands rewrite it in place.
//!
//! ## Usage
//!
//! ```sh
//! # Which visits happen on a date?
//! visits resolve -f records.json --date 2025-01-13
//!
//! # Upcoming visits (default horizon: December 31 of the from-year)
//! visits upcoming -f records.json --from 2025-01-01
//!
//! # Cancel or replace a single occurrence of a series
//! visits cancel -f records.json --template t1 --date 2025-01-13
//! visits replace -f records.json --template t1 --date 2025-01-13 --time 14:00
//!
//! # Truncate a series from a date onward
//! visits truncate -f records.json --template t1 --from 2025-01-20
//!
//! # Remove a series, or sweep cancelled/orphaned overrides
//! visits delete-series -f records.json --template t1
//! visits purge -f records.json
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use visit_engine::{parse_date, validate_records, OccurrenceChange, ScheduleRecord};

#[derive(Parser)]
#[command(name = "visits", version, about = "Visit schedule resolution and editing")]
struct Cli {
    /// Record file (JSON array of schedule records)
    #[arg(short = 'f', long, global = true, default_value = "records.json")]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved visits for one date
    Resolve {
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Project upcoming visits over a bounded horizon
    Upcoming {
        /// First date of the horizon (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last date of the horizon; defaults to December 31 of the from-year
        #[arg(long)]
        to: Option<String>,
    },
    /// Cancel a single occurrence of a series
    Cancel {
        /// Id of the originating template record
        #[arg(long)]
        template: String,
        /// Occurrence date to cancel (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Replace a single occurrence of a series with new values
    Replace {
        /// Id of the originating template record
        #[arg(long)]
        template: String,
        /// Occurrence date to replace (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// New time-of-day ("HH:MM"); keeps the template's when omitted
        #[arg(long)]
        time: Option<String>,
        /// Notes for the replacement visit
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel a series from a date onward (this and all future dates)
    Truncate {
        /// Id of the template record
        #[arg(long)]
        template: String,
        /// First date that no longer fires (YYYY-MM-DD)
        #[arg(long)]
        from: String,
    },
    /// Delete an entire series (its overrides stay until purged)
    DeleteSeries {
        /// Id of the template record
        #[arg(long)]
        template: String,
    },
    /// Delete cancelled and orphaned override records
    Purge,
}

/// Occurrence shape printed by `upcoming`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OccurrenceOut<'a> {
    occurrence_id: String,
    date: NaiveDate,
    #[serde(flatten)]
    record: &'a ScheduleRecord,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let records = load_records(&cli.file)?;

    match cli.command {
        Commands::Resolve { date } => {
            let date = parse_date(&date)?;
            let resolved = visit_engine::resolve(date, &records);
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Commands::Upcoming { from, to } => {
            let from = parse_date(&from)?;
            let to = match to {
                Some(to) => parse_date(&to)?,
                None => visit_engine::year_end(from),
            };
            let occurrences = visit_engine::upcoming(&records, from, to);
            let out: Vec<OccurrenceOut> = occurrences
                .iter()
                .map(|o| OccurrenceOut {
                    occurrence_id: o.occurrence_id(),
                    date: o.date,
                    record: o.record,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Cancel { template, date } => {
            let date = parse_date(&date)?;
            let mut store = FileStore::new(&cli.file, records.clone());
            visit_engine::override_occurrence(
                &mut store,
                &records,
                &template,
                date,
                OccurrenceChange::Cancel,
            )?;
            store.save()?;
            eprintln!("cancelled {template} on {date}");
        }
        Commands::Replace {
            template,
            date,
            time,
            notes,
        } => {
            let date = parse_date(&date)?;
            let mut store = FileStore::new(&cli.file, records.clone());
            visit_engine::override_occurrence(
                &mut store,
                &records,
                &template,
                date,
                OccurrenceChange::Replace { time, notes },
            )?;
            store.save()?;
            eprintln!("replaced {template} on {date}");
        }
        Commands::Truncate { template, from } => {
            let from = parse_date(&from)?;
            let mut store = FileStore::new(&cli.file, records.clone());
            visit_engine::truncate_series(&mut store, &records, &template, from)?;
            store.save()?;
            eprintln!("truncated {template} from {from}");
        }
        Commands::DeleteSeries { template } => {
            let mut store = FileStore::new(&cli.file, records);
            visit_engine::delete_series(&mut store, &template)?;
            store.save()?;
            eprintln!("deleted series {template}");
        }
        Commands::Purge => {
            let mut store = FileStore::new(&cli.file, records.clone());
            let purged = visit_engine::purge_orphaned(&mut store, &records)?;
            store.save()?;
            println!("purged {purged} record(s)");
        }
    }

    Ok(())
}

/// JSON-file-backed record store: mutate in memory, rewrite on save.
struct FileStore {
    path: String,
    store: visit_engine::MemoryStore,
}

impl FileStore {
    fn new(path: &str, records: Vec<ScheduleRecord>) -> Self {
        Self {
            path: path.to_string(),
            store: visit_engine::MemoryStore::with_records(records),
        }
    }

    fn save(self) -> Result<()> {
        let json = serde_json::to_string_pretty(self.store.records())?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write record file: {}", self.path))?;
        Ok(())
    }
}

impl visit_engine::RecordStore for FileStore {
    fn create(&mut self, record: ScheduleRecord) -> Result<(), visit_engine::StoreError> {
        self.store.create(record)
    }

    fn update(&mut self, record: ScheduleRecord) -> Result<(), visit_engine::StoreError> {
        self.store.update(record)
    }

    fn delete(&mut self, id: &str) -> Result<(), visit_engine::StoreError> {
        self.store.delete(id)
    }
}

fn load_records(path: &str) -> Result<Vec<ScheduleRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file: {}", path))?;
    let records: Vec<ScheduleRecord> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse records: {}", path))?;
    validate_records(&records).context("Record set failed validation")?;
    Ok(records)
}
