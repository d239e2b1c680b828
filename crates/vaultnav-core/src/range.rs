//! Date-range result types for daily-note style folders.

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::FileRecord;

/// Largest accepted `days_back`.
pub const MAX_DAYS_BACK: i64 = 365;

/// A file matched to the calendar date that produced its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedFile {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub record: FileRecord,
}

/// Files found for a contiguous, inclusive window of dates ending today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeResult {
    pub requested_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Loaded files in ascending date order. Dates without a file are omitted.
    pub files: Vec<DatedFile>,
    /// Dated files that exist but could not be read.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<DatedFile>,
    /// Always `files.len()`.
    pub total_found: usize,
}

impl DateRangeResult {
    /// Assemble a result, deriving `total_found` from `files`.
    #[must_use]
    pub fn new(
        requested_days: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        files: Vec<DatedFile>,
        failed: Vec<DatedFile>,
    ) -> Self {
        let total_found = files.len();
        Self {
            requested_days,
            start_date,
            end_date,
            files,
            failed,
            total_found,
        }
    }
}
