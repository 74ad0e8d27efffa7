use std::fmt;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

pub const MIN_AGE: i32 = 16;
pub const COLLEGE_AGE_LIMIT: i32 = 24;

/// Why a date failed one of the validity checks. Its message is what the
/// caller shows the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRejection {
    #[error("{0}: Invalid calendar date!")]
    InvalidCalendarDate(Date),

    #[error("Date of birth cannot be today or a future date!")]
    NotInPast,

    #[error("Age cannot be less than {MIN_AGE}!")]
    TooYoung,

    #[error("Age must be under {COLLEGE_AGE_LIMIT} for College Checking!")]
    TooOldForCollege,
}

/// A calendar date as entered, not yet known to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u32,
    day: u32,
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Parse `M/D/YYYY`. Only the shape is checked here; calendar validity is
    /// left to [`Date::validate_on`].
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.trim().split('/').collect();
        if parts.len() != 3 {
            return None;
        }
        let month: u32 = parts[0].trim().parse().ok()?;
        let day: u32 = parts[1].trim().parse().ok()?;
        let year: i32 = parts[2].trim().parse().ok()?;
        Some(Self::new(year, month, day))
    }

    #[allow(dead_code)]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[allow(dead_code)]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[allow(dead_code)]
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_calendar_date(&self) -> bool {
        (1..=NaiveDate::MAX.year()).contains(&self.year)
            && self.day >= 1
            && days_in_month(self.year, self.month).is_some_and(|max| self.day <= max)
    }

    /// Whole years elapsed since this date as of `today`.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let age = today.year().saturating_sub(self.year);
        if self.month > today.month() || (self.month == today.month() && self.day > today.day()) {
            age.saturating_sub(1)
        } else {
            age
        }
    }

    /// General validity for a date of birth: a real calendar date, strictly in
    /// the past, and at least [`MIN_AGE`] years ago.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), DateRejection> {
        if !self.is_calendar_date() {
            return Err(DateRejection::InvalidCalendarDate(*self));
        }
        let now = Self::new(today.year(), today.month(), today.day());
        if *self >= now {
            return Err(DateRejection::NotInPast);
        }
        if self.age_on(today) < MIN_AGE {
            return Err(DateRejection::TooYoung);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DateRejection> {
        self.validate_on(today())
    }

    #[allow(dead_code)]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// College Checking holders must be in `[MIN_AGE, COLLEGE_AGE_LIMIT)`.
    pub fn college_eligibility_on(&self, today: NaiveDate) -> Result<(), DateRejection> {
        let age = self.age_on(today);
        if age >= COLLEGE_AGE_LIMIT {
            return Err(DateRejection::TooOldForCollege);
        }
        if age < MIN_AGE {
            return Err(DateRejection::TooYoung);
        }
        Ok(())
    }

    #[allow(dead_code)]
    pub fn is_college_eligible(&self) -> bool {
        self.college_eligibility_on(today()).is_ok()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.month, self.day, self.year)
    }
}
