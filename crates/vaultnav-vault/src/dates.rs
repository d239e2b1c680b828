//! Date-window loading for daily-note style folders.
//!
//! Each calendar date in the window maps to one candidate file name.
//! Absent dates are expected and simply left out of the result.

use chrono::{Duration, Local, NaiveDate};
use tracing::debug;

use vaultnav_core::error::{ReadError, Result, VaultError};
use vaultnav_core::range::{DateRangeResult, DatedFile, MAX_DAYS_BACK};
use vaultnav_core::record::FileRecord;

use crate::accessor::FileAccessor;
use crate::resolver::{PathResolver, ResolvedPath};

/// Build a filename pattern from a chrono format string, e.g. `%Y-%m-%d.md`.
///
/// The format must already be validated (see
/// [`VaultConfig::validate`](vaultnav_core::VaultConfig::validate)).
pub fn date_pattern(format: &str) -> impl Fn(NaiveDate) -> String + '_ {
    move |date| date.format(format).to_string()
}

pub struct DateRangeLoader;

impl DateRangeLoader {
    /// Check `days_back` is within `1..=365`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidRange`] otherwise.
    pub fn validate_days(days_back: i64) -> Result<()> {
        if (1..=MAX_DAYS_BACK).contains(&days_back) {
            Ok(())
        } else {
            Err(VaultError::InvalidRange { days_back })
        }
    }

    /// The inclusive, ascending window of `days_back` dates ending at `end`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidRange`] for an out-of-bounds `days_back`.
    pub fn window(end: NaiveDate, days_back: i64) -> Result<Vec<NaiveDate>> {
        Self::validate_days(days_back)?;
        let start = end - Duration::days(days_back - 1);
        Ok(start.iter_days().take_while(|d| *d <= end).collect())
    }

    /// Load the window ending today (local calendar date).
    ///
    /// # Errors
    ///
    /// See [`load_range_ending`](Self::load_range_ending).
    pub async fn load_range<F>(
        root: &ResolvedPath,
        days_back: i64,
        filename_pattern: F,
    ) -> Result<DateRangeResult>
    where
        F: Fn(NaiveDate) -> String,
    {
        let today = Local::now().date_naive();
        Self::load_range_ending(root, days_back, today, filename_pattern).await
    }

    /// Load every date in the window ending at `end` whose file exists.
    ///
    /// Files that exist but cannot be read go to [`DateRangeResult::failed`]
    /// and are not counted in `total_found`. A filesystem failure on one
    /// date (permission, symlink loop) is recorded there too.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidRange`] before any I/O if `days_back` is
    /// out of bounds, and a path rejection if a generated name leaves `root`.
    pub async fn load_range_ending<F>(
        root: &ResolvedPath,
        days_back: i64,
        end: NaiveDate,
        filename_pattern: F,
    ) -> Result<DateRangeResult>
    where
        F: Fn(NaiveDate) -> String,
    {
        let dates = Self::window(end, days_back)?;
        let start = dates.first().copied().unwrap_or(end);
        let scope = PathResolver::for_resolved(root);

        let mut files = Vec::new();
        let mut failed = Vec::new();

        for date in dates {
            let filename = filename_pattern(date);
            let loaded = match scope.resolve_async(&filename).await {
                Ok(resolved) => FileAccessor::load(&resolved, scope.root()).await,
                Err(e) => Err(e),
            };

            let record = match loaded {
                Ok(record) => record,
                Err(e) if e.is_path_rejection() => return Err(e),
                Err(VaultError::Io(e)) => {
                    debug!(%date, %filename, error = %e, "dated file not accessible");
                    FileRecord::unreadable(
                        scope.root().join(&filename),
                        filename,
                        ReadError::from_io(&e),
                        None,
                        None,
                    )
                }
                Err(e) => return Err(e),
            };

            if record.is_loaded() {
                files.push(DatedFile { date, record });
            } else if record.exists {
                debug!(%date, path = %record.path.display(), "dated file unreadable");
                failed.push(DatedFile { date, record });
            }
        }

        Ok(DateRangeResult::new(days_back, start, end, files, failed))
    }
}
