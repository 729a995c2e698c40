//! Month model behind the day picker.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// # Errors
    ///
    /// Returns `AppError::InvalidDate` unless `month` is in `1..=12` and the
    /// year is representable.
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}")))
    }

    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn next(&self) -> Self {
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

    #[must_use]
    pub fn prev(&self) -> Self {
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

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next_first)) => {
                u32::try_from((next_first - first).num_days()).unwrap_or(0)
            }
            _ => 31,
        }
    }

    /// Empty cells before day 1 in a Sunday-first grid.
    #[must_use]
    pub fn leading_blanks(&self) -> u32 {
        self.first_day()
            .map_or(0, |d| d.weekday().num_days_from_sunday())
    }

    /// The calendar date of `day` in this month.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDate` if the month has no such day.
    pub fn date(&self, day: u32) -> AppResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            AppError::InvalidDate(format!("{}-{:02}-{day:02}", self.year, self.month))
        })
    }

    /// One entry per day of the month, flagged when listed in `available`.
    ///
    /// Listed days outside the month are ignored.
    #[must_use]
    pub fn decorate(&self, available: &[u32]) -> Vec<CalendarDayMeta> {
        (1..=self.days_in_month())
            .map(|day| CalendarDayMeta {
                day,
                has_data: available.contains(&day),
            })
            .collect()
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for CalendarMonth {
    type Err = AppError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidDate(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDayMeta {
    pub day: u32,
    pub has_data: bool,
}

/// Displayed month, its availability flags and the selected day.
#[derive(Debug, Clone)]
pub struct Calendar {
    month: CalendarMonth,
    days: Vec<CalendarDayMeta>,
    selected: Option<NaiveDate>,
}

impl Calendar {
    #[must_use]
    pub fn new(month: CalendarMonth) -> Self {
        Self {
            month,
            days: month.decorate(&[]),
            selected: None,
        }
    }

    #[must_use]
    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    #[must_use]
    pub fn days(&self) -> &[CalendarDayMeta] {
        &self.days
    }

    #[must_use]
    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Switch the displayed month. Availability flags start cleared.
    pub fn show_month(&mut self, month: CalendarMonth) {
        self.month = month;
        self.days = month.decorate(&[]);
    }

    pub fn show_next(&mut self) -> CalendarMonth {
        self.show_month(self.month.next());
        self.month
    }

    pub fn show_prev(&mut self) -> CalendarMonth {
        self.show_month(self.month.prev());
        self.month
    }

    /// Apply availability for `month`. Ignored (returns `false`) when the
    /// user has navigated elsewhere in the meantime.
    pub fn set_available(&mut self, month: CalendarMonth, available: &[u32]) -> bool {
        if month != self.month {
            return false;
        }
        self.days = month.decorate(available);
        true
    }

    /// Select `day` of the displayed month.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDate` if the month has no such day.
    pub fn select(&mut self, day: u32) -> AppResult<NaiveDate> {
        let date = self.month.date(day)?;
        self.selected = Some(date);
        Ok(date)
    }

    /// Select an arbitrary date, moving the display to its month if needed.
    pub fn select_date(&mut self, date: NaiveDate) {
        let month = CalendarMonth::containing(date);
        if month != self.month {
            self.show_month(month);
        }
        self.selected = Some(date);
    }

    /// Plain-text month grid.
    ///
    /// Days with data carry a trailing `*`; the selected day is bracketed.
    #[must_use]
    pub fn render_grid(&self) -> String {
        let title = self
            .month
            .first_day()
            .map_or_else(|| self.month.to_string(), |d| d.format("%B %Y").to_string());

        let mut out = format!("{title:^28}\n");
        for name in WEEKDAY_HEADER {
            out.push_str(&format!(" {name} "));
        }
        out.push('\n');

        let mut column = 0;
        for _ in 0..self.month.leading_blanks() {
            out.push_str("    ");
            column += 1;
        }
        for meta in &self.days {
            let is_selected = self
                .selected
                .is_some_and(|d| CalendarMonth::containing(d) == self.month && d.day() == meta.day);
            let (open, close) = match (is_selected, meta.has_data) {
                (true, _) => ('[', ']'),
                (false, true) => (' ', '*'),
                (false, false) => (' ', ' '),
            };
            out.push_str(&format!("{open}{:>2}{close}", meta.day));
            column += 1;
            if column == 7 {
                out.truncate(out.trim_end().len());
                out.push('\n');
                column = 0;
            }
        }
        if column != 0 {
            out.truncate(out.trim_end().len());
            out.push('\n');
        }
        out
    }
}
