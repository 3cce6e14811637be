//! Report date selection.
//!
//! A report window is either a canned period ending today or an explicit
//! `[start, end]` pair. [`ReportFilter`] holds both plus the list pager, and
//! makes sure only one mode is active and that every change of window puts
//! the pager back on page 1.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::cache::QueryKey;
use crate::error::{ApiError, ApiResult};
use crate::pagination::Pager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimePeriod {
    Today,
    Last3Days,
    Last7Days,
    Last30Days,
    Last180Days,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::Today,
        TimePeriod::Last3Days,
        TimePeriod::Last7Days,
        TimePeriod::Last30Days,
        TimePeriod::Last180Days,
    ];

    pub fn days_back(self) -> i64 {
        match self {
            TimePeriod::Today => 0,
            TimePeriod::Last3Days => 3,
            TimePeriod::Last7Days => 7,
            TimePeriod::Last30Days => 30,
            TimePeriod::Last180Days => 180,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::Today => "Today",
            TimePeriod::Last3Days => "3 Days",
            TimePeriod::Last7Days => "7 Days",
            TimePeriod::Last30Days => "30 Days",
            TimePeriod::Last180Days => "180 Days",
        }
    }

    pub fn range_ending(self, today: NaiveDate) -> DateRange {
        DateRange {
            start: today - Duration::days(self.days_back()),
            end: today,
        }
    }
}

impl FromStr for TimePeriod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "1day" | "1d" => Ok(TimePeriod::Today),
            "3days" | "3d" => Ok(TimePeriod::Last3Days),
            "7days" | "7d" | "week" => Ok(TimePeriod::Last7Days),
            "30days" | "30d" | "1month" => Ok(TimePeriod::Last30Days),
            "180days" | "180d" | "6months" => Ok(TimePeriod::Last180Days),
            other => Err(ApiError::Validation(format!(
                "Unknown period '{other}' (expected today, 3days, 7days, 30days or 180days)"
            ))),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive calendar-day window sent as `startDate`/`endDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ApiResult<Self> {
        if start > end {
            return Err(ApiError::Validation(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        vec![
            ("startDate".to_string(), self.start.format("%Y-%m-%d").to_string()),
            ("endDate".to_string(), self.end.format("%Y-%m-%d").to_string()),
        ]
    }

    /// Cache key for `resource` filtered to this window.
    pub fn query_key(&self, resource: &str) -> QueryKey {
        self.query_params()
            .into_iter()
            .fold(QueryKey::new(resource), |key, (name, value)| key.with(name, value))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateSelection {
    Period(TimePeriod),
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateSelection {
    /// Concrete window, or `None` while a custom range is incomplete or
    /// inverted (nothing is fetched in that state).
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        match *self {
            DateSelection::Period(p) => Some(p.range_ending(today)),
            DateSelection::Custom {
                start: Some(start),
                end: Some(end),
            } => DateRange::new(start, end).ok(),
            DateSelection::Custom { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReportFilter {
    period: TimePeriod,
    custom_active: bool,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    pager: Pager,
}

impl ReportFilter {
    pub fn new(page_size: usize) -> Self {
        Self {
            period: TimePeriod::Today,
            custom_active: false,
            custom_start: None,
            custom_end: None,
            pager: Pager::new(page_size),
        }
    }

    /// Filter for a one-shot command: any explicit bound means a custom
    /// range, otherwise the canned `period` applies.
    pub fn from_args(
        period: TimePeriod,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page_size: usize,
    ) -> Self {
        let mut filter = Self::new(page_size);
        if from.is_some() || to.is_some() {
            filter.set_custom_range(from, to);
        } else {
            filter.select_period(period);
        }
        filter
    }

    /// Choose a canned period; leaves custom mode.
    pub fn select_period(&mut self, period: TimePeriod) {
        self.period = period;
        self.custom_active = false;
        self.pager.reset();
    }

    /// Flip between canned and custom mode.
    pub fn toggle_custom(&mut self) {
        self.custom_active = !self.custom_active;
        self.pager.reset();
    }

    /// Set the custom endpoints and switch to custom mode.
    pub fn set_custom_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.custom_start = start;
        self.custom_end = end;
        self.custom_active = true;
        self.pager.reset();
    }

    pub fn is_custom(&self) -> bool {
        self.custom_active
    }

    pub fn selection(&self) -> DateSelection {
        if self.custom_active {
            DateSelection::Custom {
                start: self.custom_start,
                end: self.custom_end,
            }
        } else {
            DateSelection::Period(self.period)
        }
    }

    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        self.selection().resolve(today)
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }
}
