//! Calendar month bucket (`YYYY-MM`).

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid year-month regex"));

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The month immediately before this one; January rolls to December.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn succ(self) -> Self {
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

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.succ().first_day().and_then(|next| next.pred_opt())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Rejected `YYYY-MM` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseYearMonthError(pub String);

impl Display for ParseYearMonthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month `{}`; expected YYYY-MM", self.0)
    }
}

impl std::error::Error for ParseYearMonthError {}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let caps = YEAR_MONTH_RE
            .captures(trimmed)
            .ok_or_else(|| ParseYearMonthError(trimmed.to_string()))?;
        let year = caps[1]
            .parse::<i32>()
            .map_err(|_| ParseYearMonthError(trimmed.to_string()))?;
        let month = caps[2]
            .parse::<u32>()
            .map_err(|_| ParseYearMonthError(trimmed.to_string()))?;
        Self::new(year, month).ok_or_else(|| ParseYearMonthError(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::YearMonth;
    use chrono::NaiveDate;

    #[test]
    fn pred_rolls_back_over_january() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.pred(), YearMonth::new(2023, 12).unwrap());
        assert_eq!(jan.pred().succ(), jan);
    }

    #[test]
    fn display_and_parse_use_zero_padded_months() {
        let month: YearMonth = "2024-05".parse().unwrap();
        assert_eq!(month.to_string(), "2024-05");
        assert!("2024-5".parse::<YearMonth>().is_err());
        assert!("2024-13".parse::<YearMonth>().is_err());
    }

    #[test]
    fn last_day_handles_leap_february() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }
}
