//! Trailing one-month date windows.
//!
//! Windows are produced most-recent-first by repeatedly stepping the anchor
//! back one calendar month. A step that lands on a day the target month does
//! not have clamps to that month's last day (2021-03-31 becomes 2021-02-28).

use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Default number of trailing months covered by one request.
pub const DEFAULT_MONTHS: u32 = 12;

/// One calendar-month date range, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Upstream range syntax, `YYYY-MM-DD..YYYY-MM-DD`.
    pub fn range_query(&self) -> String {
        format!("{}..{}", self.start, self.end)
    }
}

/// Produce `month_count` windows ending at `anchor`, newest first.
pub fn generate(anchor: NaiveDate, month_count: u32) -> Vec<DateWindow> {
    let mut windows = Vec::new();
    let mut end = anchor;

    for _ in 0..month_count {
        // Only fails at the very start of chrono's representable range.
        let Some(start) = end.checked_sub_months(Months::new(1)) else {
            break;
        };
        windows.push(DateWindow { start, end });
        end = start;
    }

    windows
}
