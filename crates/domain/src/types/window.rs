//! Date windows re-scanned on every pass

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{OrderSyncError, Result};

/// Inclusive calendar-date range handed to a channel adapter.
///
/// Both ends are date-only in the orchestrator's time zone and serialize as
/// `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl SyncWindow {
    /// Build a window, rejecting `start_date > end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if start_date > end_date {
            return Err(OrderSyncError::InvalidInput(format!(
                "sync window start {start_date} is after end {end_date}"
            )));
        }
        Ok(Self { start_date, end_date })
    }

    /// `[today - days, today]`. Negative lookbacks collapse to `today`.
    pub fn lookback(today: NaiveDate, days: i64) -> Self {
        let start_date = today - Duration::days(days.max(0));
        Self { start_date, end_date: today }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Wire format of the start date.
    pub fn start_param(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }

    /// Wire format of the end date.
    pub fn end_param(&self) -> String {
        self.end_date.format("%Y-%m-%d").to_string()
    }
}
