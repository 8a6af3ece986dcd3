//! Month-bucketed, zero-filled series.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One point of a display series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
}

/// Count records per calendar month from the earliest to the latest month
/// present, filling empty months with zero.
///
/// Records for which `select` yields `None` are left out entirely. No dated
/// records means an empty series.
pub fn aggregate<T, F>(records: &[T], select: F) -> Vec<MonthCount>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for date in records.iter().filter_map(select) {
        *counts.entry(YearMonth::of(date)).or_insert(0) += 1;
    }

    let (Some(&first), Some(&last)) = (counts.keys().next(), counts.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut month = first;
    while month <= last {
        series.push(MonthCount {
            month: month.to_string(),
            count: counts.get(&month).copied().unwrap_or(0),
        });
        month = month.next();
    }

    series
}
