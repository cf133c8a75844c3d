use chrono::{NaiveDate, Utc};

use crate::error::{RecognitionError, Result};
use crate::invoice::dates::parse_day;

/// Inclusive reporting window at day granularity.
///
/// `from == None` is unbounded in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
}

impl ReportWindow {
    pub fn new(from: Option<NaiveDate>, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Window from the caller's optional bounds. A missing `to` means today (UTC).
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        Self::parse_with_today(from, to, Utc::now().date_naive())
    }

    pub fn parse_with_today(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Result<Self> {
        let from = from
            .map(|s| parse_day(s).ok_or_else(|| RecognitionError::invalid_date("fromDate", s)))
            .transpose()?;
        let to = match to {
            Some(s) => parse_day(s).ok_or_else(|| RecognitionError::invalid_date("toDate", s))?,
            None => today,
        };
        Ok(Self { from, to })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.map_or(true, |from| day >= from) && day <= self.to
    }

    /// Intersect `[first, last]` with the window.
    pub fn clip(&self, first: NaiveDate, last: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.from.map_or(first, |from| first.max(from));
        let end = last.min(self.to);
        (start <= end).then_some((start, end))
    }
}
