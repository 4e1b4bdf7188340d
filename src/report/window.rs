//! Calendar-month windows used as the buckets for every report.
//!
//! A window covers `start <= date < end`, where `start` is the first day of a
//! month and `end` is the first day of the following month. Consecutive
//! windows therefore share a boundary and never overlap.

use std::ops::Range;

use time::{Date, Month};

use crate::Error;

/// The most months a trailing chart may cover.
pub const MAX_TRAILING_MONTHS: u32 = 120;
/// The earliest year a report may be requested for.
pub const MIN_REPORT_YEAR: i32 = 1900;
/// The latest year a report may be requested for.
///
/// December's window ends on the first day of the next year, which must still
/// be a representable date.
pub const MAX_REPORT_YEAR: i32 = 9998;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// A half-open date range covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    year: i32,
    month: Month,
    start: Date,
    end: Date,
}

impl MonthWindow {
    /// Create the window for `month` of `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if `year` is outside
    /// [MIN_REPORT_YEAR]..=[MAX_REPORT_YEAR].
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
            return Err(Error::InvalidPeriod(format!(
                "the year {year} is outside the supported range {MIN_REPORT_YEAR} to {MAX_REPORT_YEAR}"
            )));
        }

        let (next_year, next_month) = match month {
            Month::December => (year + 1, Month::January),
            month => (year, month.next()),
        };

        Ok(Self {
            year,
            month,
            start: first_day_of(year, month)?,
            end: first_day_of(next_year, next_month)?,
        })
    }

    /// Create the window for the month that `date` falls in.
    pub fn containing(date: Date) -> Result<Self, Error> {
        Self::new(date.year(), date.month())
    }

    /// The window for the month before this one.
    pub fn previous(&self) -> Result<Self, Error> {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    /// The calendar year of the window.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The first day of the window.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The first day after the window.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// The window as a half-open range, suitable for store queries.
    pub fn date_range(&self) -> Range<Date> {
        self.start..self.end
    }

    /// The three-letter month name, e.g. "Jan".
    pub fn short_label(&self) -> &'static str {
        month_abbrev(self.month)
    }

    /// The full month name, e.g. "January".
    pub fn full_label(&self) -> String {
        self.month.to_string()
    }
}

/// Build the `count` windows that end with the month containing `today`,
/// oldest first.
///
/// # Errors
/// Returns [Error::InvalidPeriod] if `count` is zero or greater than
/// [MAX_TRAILING_MONTHS], or if the windows would reach outside the supported
/// years.
pub fn trailing_windows(count: u32, today: Date) -> Result<Vec<MonthWindow>, Error> {
    if count == 0 || count > MAX_TRAILING_MONTHS {
        return Err(Error::InvalidPeriod(format!(
            "the number of months must be between 1 and {MAX_TRAILING_MONTHS}, got {count}"
        )));
    }

    let mut window = MonthWindow::containing(today)?;
    let mut windows = Vec::with_capacity(count as usize);
    windows.push(window);

    for _ in 1..count {
        window = window.previous()?;
        windows.push(window);
    }

    windows.reverse();

    Ok(windows)
}

/// Build the windows for January through December of `year`.
pub fn year_windows(year: i32) -> Result<Vec<MonthWindow>, Error> {
    MONTHS
        .iter()
        .map(|&month| MonthWindow::new(year, month))
        .collect()
}

fn first_day_of(year: i32, month: Month) -> Result<Date, Error> {
    Date::from_calendar_date(year, month, 1)
        .map_err(|error| Error::InvalidPeriod(format!("{month} {year}: {error}")))
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
