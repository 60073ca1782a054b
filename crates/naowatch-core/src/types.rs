//! Core data model: target dates, museums, availability verdicts, run summary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WatchError;

/// A calendar date the user wants checked. Immutable input, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetDate(pub NaiveDate);

impl TargetDate {
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Filesystem-safe form used for screenshot filenames (`2025_10_07`).
    pub fn file_stem(&self) -> String {
        self.0.format("%Y_%m_%d").to_string()
    }
}

impl FromStr for TargetDate {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(TargetDate)
            .map_err(|e| WatchError::Config(format!("Invalid date '{s}' (want YYYY-MM-DD): {e}")))
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A museum booking page to watch. Static configuration, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuseumTarget {
    pub name: String,
    pub url: String,
}

impl MuseumTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Verdict for one (museum, date) check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    SoldOut,
    Unknown,
}

impl AvailabilityStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityStatus::Available)
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AvailabilityStatus::Available => "AVAILABLE",
            AvailabilityStatus::SoldOut => "SOLD_OUT",
            AvailabilityStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One availability check outcome. Created once, never revised within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub museum: MuseumTarget,
    pub date: TargetDate,
    pub status: AvailabilityStatus,
    /// The concrete UI marker that produced the verdict
    /// (e.g. `available.svg`, `sold-out-layout class`, `date cell not found`).
    pub evidence: String,
    pub checked_at: DateTime<Utc>,
}

impl AvailabilityResult {
    pub fn new(
        museum: MuseumTarget,
        date: TargetDate,
        status: AvailabilityStatus,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            museum,
            date,
            status,
            evidence: evidence.into(),
            checked_at: Utc::now(),
        }
    }
}

/// A museum whose whole pass failed (page or iframe never became ready).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuseumFailure {
    pub museum: String,
    pub reason: String,
}

/// Aggregate outcome of one run: every result plus every fatal failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub results: Vec<AvailabilityResult>,
    pub failures: Vec<MuseumFailure>,
}

impl RunSummary {
    /// 0 on a clean run, non-zero when any museum's navigation failed.
    pub fn exit_code(&self) -> i32 {
        if self.failures.is_empty() { 0 } else { 1 }
    }

    pub fn available(&self) -> impl Iterator<Item = &AvailabilityResult> {
        self.results.iter().filter(|r| r.status.is_available())
    }

    /// Compact summary table for the console.
    pub fn render_table(&self) -> String {
        let mut out = String::from(
            "Date        Museum                Status     Evidence\n\
             ----------  --------------------  ---------  ----------------------------------------\n",
        );
        for r in &self.results {
            out.push_str(&format!(
                "{}  {:<20}  {:<9}  {}\n",
                r.date,
                truncate(&r.museum.name, 20),
                r.status,
                truncate(&r.evidence, 40),
            ));
        }
        for f in &self.failures {
            out.push_str(&format!(
                "----------  {:<20}  {:<9}  {}\n",
                truncate(&f.museum, 20),
                "FAILED",
                truncate(&f.reason, 40),
            ));
        }
        out
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
