use std::cmp::Ordering;
use std::fmt;

use crate::date::Date;

/// An account holder. Ordered by last name, then first name (both
/// case-insensitive), then date of birth; equality follows the ordering.
#[derive(Debug, Clone)]
pub struct Profile {
    first_name: String,
    last_name: String,
    dob: Date,
}

impl Profile {
    pub fn new(first_name: &str, last_name: &str, dob: Date) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            dob,
        }
    }

    #[allow(dead_code)]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[allow(dead_code)]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn dob(&self) -> Date {
        self.dob
    }
}

impl Ord for Profile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.last_name
            .to_lowercase()
            .cmp(&other.last_name.to_lowercase())
            .then_with(|| {
                self.first_name
                    .to_lowercase()
                    .cmp(&other.first_name.to_lowercase())
            })
            .then_with(|| self.dob.cmp(&other.dob))
    }
}

impl PartialOrd for Profile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Profile {}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.first_name, self.last_name, self.dob)
    }
}
