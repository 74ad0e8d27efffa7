use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use thiserror::Error;

use crate::account::{AccountKey, AccountType, OpenRequest, Rejection};
use crate::date::Date;
use crate::error::Result;
use crate::profile::Profile;
use crate::store::{AccountStore, OpenStatus};

/// Why one bulk-load record (or session command) was rejected before reaching
/// the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Missing data for this request.")]
    Incomplete,

    #[error("{0}")]
    UnknownType(String),

    #[error("Date of birth {0} is not a valid date.")]
    BadDate(String),

    #[error("{0} is not a valid amount.")]
    BadAmount(String),

    #[error("{0} is not a valid campus code; it must be an integer.")]
    BadCampus(String),

    #[error("{0} is not a valid loyalty flag; use 0 or 1.")]
    BadLoyalty(String),

    #[error("Missing {0} for this account type.")]
    MissingParam(&'static str),

    #[error("Unreadable record: {0}")]
    Unreadable(String),

    #[error("{0}")]
    Rejected(#[from] Rejection),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub line: u64,
    pub error: LoadError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub opened: Vec<AccountKey>,
    pub duplicates: Vec<AccountKey>,
    pub failures: Vec<LoadFailure>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace([',', '"', '$'], "");
    let amount: f64 = s.trim().parse().ok()?;
    amount.is_finite().then_some(amount)
}

fn field<'a>(record: &'a StringRecord, index: usize) -> Option<&'a str> {
    record.get(index).map(str::trim).filter(|f| !f.is_empty())
}

/// Turn one `type,first,last,dob,balance[,param]` record into a request.
pub fn parse_record(record: &StringRecord) -> std::result::Result<OpenRequest, LoadError> {
    if record.len() < 5 {
        return Err(LoadError::Incomplete);
    }
    let (Some(code), Some(first), Some(last), Some(dob_raw), Some(amount_raw)) = (
        field(record, 0),
        field(record, 1),
        field(record, 2),
        field(record, 3),
        field(record, 4),
    ) else {
        return Err(LoadError::Incomplete);
    };

    let account_type: AccountType = code.parse().map_err(LoadError::UnknownType)?;
    let dob = Date::parse(dob_raw).ok_or_else(|| LoadError::BadDate(dob_raw.to_string()))?;
    let amount = parse_amount(amount_raw).ok_or_else(|| LoadError::BadAmount(amount_raw.to_string()))?;

    let mut request = OpenRequest {
        account_type,
        holder: Profile::new(first, last, dob),
        amount,
        campus: None,
        loyal: false,
    };

    match account_type {
        AccountType::CollegeChecking => {
            let raw = field(record, 5).ok_or(LoadError::MissingParam("campus code"))?;
            let campus: i32 = raw.parse().map_err(|_| LoadError::BadCampus(raw.to_string()))?;
            request.campus = Some(campus);
        }
        AccountType::Savings => {
            let raw = field(record, 5).ok_or(LoadError::MissingParam("loyalty flag"))?;
            request.loyal = match raw {
                "1" => true,
                "0" => false,
                _ => return Err(LoadError::BadLoyalty(raw.to_string())),
            };
        }
        AccountType::Checking | AccountType::MoneyMarket => {}
    }
    Ok(request)
}

// ---------------------------------------------------------------------------
// load_accounts
// ---------------------------------------------------------------------------

/// Open every record from `input` into `store`. A bad record is reported and
/// skipped; the rest of the batch still loads.
pub fn load_accounts<R: Read>(input: R, store: &mut AccountStore, today: NaiveDate) -> LoadReport {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut report = LoadReport::default();

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                report.failures.push(LoadFailure {
                    line,
                    error: LoadError::Unreadable(e.to_string()),
                });
                continue;
            }
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let built = parse_record(&record).and_then(|req| req.build_on(today).map_err(LoadError::from));
        let account = match built {
            Ok(account) => account,
            Err(error) => {
                log::warn!("line {line}: {error}");
                report.failures.push(LoadFailure { line, error });
                continue;
            }
        };
        let key = account.key();
        match store.open(account) {
            OpenStatus::Opened => report.opened.push(key),
            OpenStatus::Duplicate => report.duplicates.push(key),
        }
    }
    report
}

pub fn load_file(path: &Path, store: &mut AccountStore, today: NaiveDate) -> Result<LoadReport> {
    let file = std::fs::File::open(path)?;
    Ok(load_accounts(std::io::BufReader::new(file), store, today))
}
