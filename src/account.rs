use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::date::{today, DateRejection};
use crate::fmt::{money, round_cents};
use crate::profile::Profile;

const CHECKING_RATE: f64 = 0.01;
const CHECKING_FEE: f64 = 12.0;
const CHECKING_FEE_WAIVER: f64 = 1000.0;

const SAVINGS_RATE: f64 = 0.04;
const SAVINGS_FEE: f64 = 25.0;
const SAVINGS_FEE_WAIVER: f64 = 500.0;
const LOYALTY_BONUS: f64 = 0.0025;

const MONEY_MARKET_RATE: f64 = 0.045;
const MONEY_MARKET_FEE: f64 = 10.0;
pub const MONEY_MARKET_MINIMUM: f64 = 2000.0;
const MONEY_MARKET_FREE_WITHDRAWALS: u32 = 3;

// ---------------------------------------------------------------------------
// Account types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Checking,
    CollegeChecking,
    Savings,
    MoneyMarket,
}

impl AccountType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Checking => "C",
            Self::CollegeChecking => "CC",
            Self::Savings => "S",
            Self::MoneyMarket => "MM",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::CollegeChecking => "College Checking",
            Self::Savings => "Savings",
            Self::MoneyMarket => "Money Market::Savings",
        }
    }

    /// Whether accounts of these two types for one holder count as the same
    /// account. A plain Checking and a College Checking collide.
    pub fn collides_with(&self, other: AccountType) -> bool {
        use AccountType::*;
        *self == other
            || matches!((self, other), (Checking, CollegeChecking) | (CollegeChecking, Checking))
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Self::Checking),
            "CC" => Ok(Self::CollegeChecking),
            "S" => Ok(Self::Savings),
            "MM" => Ok(Self::MoneyMarket),
            other => Err(format!("{other} is an invalid account type.")),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Campus {
    NewBrunswick,
    Newark,
    Camden,
}

impl Campus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::NewBrunswick),
            1 => Some(Self::Newark),
            2 => Some(Self::Camden),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewBrunswick => "NEW_BRUNSWICK",
            Self::Newark => "NEWARK",
            Self::Camden => "CAMDEN",
        }
    }
}

// ---------------------------------------------------------------------------
// Rejections and outcomes
// ---------------------------------------------------------------------------

/// Why an account (or a transaction against one) was not created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Initial deposit cannot be 0 or negative.")]
    NonPositiveDeposit,

    #[error("Amount cannot be 0 or negative.")]
    NonPositiveAmount,

    #[error("{0} is an invalid campus code; use 0, 1 or 2.")]
    InvalidCampus(i32),

    #[error("Missing campus code for College Checking.")]
    MissingCampus,

    #[error("{0}")]
    InvalidDob(DateRejection),

    #[error("{0}")]
    Ineligible(DateRejection),

    #[error("Minimum of $2,000 to open a Money Market account.")]
    BelowMinimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Withdrawn,
    InsufficientFunds,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// What the store looks accounts up by: holder plus declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountKey {
    pub holder: Profile,
    pub account_type: AccountType,
}

impl AccountKey {
    pub fn new(holder: Profile, account_type: AccountType) -> Self {
        Self {
            holder,
            account_type,
        }
    }

    pub fn matches(&self, other: &AccountKey) -> bool {
        self.holder == other.holder && self.account_type.collides_with(other.account_type)
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.holder, self.account_type.code())
    }
}

/// A deposit or withdrawal request against a stored account.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub key: AccountKey,
    pub amount: f64,
}

impl Transaction {
    pub fn new(key: AccountKey, amount: f64) -> Result<Self, Rejection> {
        if amount <= 0.0 {
            return Err(Rejection::NonPositiveAmount);
        }
        Ok(Self { key, amount })
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Checking,
    CollegeChecking { campus: Campus },
    Savings { loyal: bool },
    MoneyMarket { loyal: bool, withdrawals: u32 },
}

#[derive(Debug, Clone)]
pub struct Account {
    holder: Profile,
    balance: f64,
    variant: Variant,
}

impl Account {
    pub fn checking(holder: Profile, balance: f64) -> Result<Self, Rejection> {
        require_positive(balance)?;
        Ok(Self {
            holder,
            balance,
            variant: Variant::Checking,
        })
    }

    #[allow(dead_code)]
    pub fn college_checking(holder: Profile, balance: f64, campus_code: i32) -> Result<Self, Rejection> {
        Self::college_checking_on(holder, balance, campus_code, today())
    }

    pub fn college_checking_on(
        holder: Profile,
        balance: f64,
        campus_code: i32,
        today: NaiveDate,
    ) -> Result<Self, Rejection> {
        require_positive(balance)?;
        let campus = Campus::from_code(campus_code).ok_or(Rejection::InvalidCampus(campus_code))?;
        holder
            .dob()
            .college_eligibility_on(today)
            .map_err(Rejection::Ineligible)?;
        Ok(Self {
            holder,
            balance,
            variant: Variant::CollegeChecking { campus },
        })
    }

    pub fn savings(holder: Profile, balance: f64, loyal: bool) -> Result<Self, Rejection> {
        require_positive(balance)?;
        Ok(Self {
            holder,
            balance,
            variant: Variant::Savings { loyal },
        })
    }

    pub fn money_market(holder: Profile, balance: f64) -> Result<Self, Rejection> {
        require_positive(balance)?;
        if balance < MONEY_MARKET_MINIMUM {
            return Err(Rejection::BelowMinimum);
        }
        Ok(Self {
            holder,
            balance,
            variant: Variant::MoneyMarket {
                loyal: true,
                withdrawals: 0,
            },
        })
    }

    pub fn holder(&self) -> &Profile {
        &self.holder
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Current balance rounded to cents.
    pub fn balance(&self) -> f64 {
        round_cents(self.balance)
    }

    pub fn account_type(&self) -> AccountType {
        match self.variant {
            Variant::Checking => AccountType::Checking,
            Variant::CollegeChecking { .. } => AccountType::CollegeChecking,
            Variant::Savings { .. } => AccountType::Savings,
            Variant::MoneyMarket { .. } => AccountType::MoneyMarket,
        }
    }

    pub fn type_code(&self) -> &'static str {
        self.account_type().code()
    }

    pub fn key(&self) -> AccountKey {
        AccountKey::new(self.holder.clone(), self.account_type())
    }

    #[allow(dead_code)]
    pub fn is_loyal(&self) -> bool {
        match self.variant {
            Variant::Savings { loyal } | Variant::MoneyMarket { loyal, .. } => loyal,
            _ => false,
        }
    }

    #[allow(dead_code)]
    pub fn withdrawals(&self) -> u32 {
        match self.variant {
            Variant::MoneyMarket { withdrawals, .. } => withdrawals,
            _ => 0,
        }
    }

    /// Same holder and colliding types; see [`AccountType::collides_with`].
    pub fn matches(&self, key: &AccountKey) -> bool {
        self.holder == key.holder && self.account_type().collides_with(key.account_type)
    }

    /// Report ordering: type code as a string, then holder.
    pub fn cmp_by_type_and_holder(&self, other: &Account) -> Ordering {
        self.type_code()
            .cmp(other.type_code())
            .then_with(|| self.holder.cmp(&other.holder))
    }

    pub fn monthly_interest(&self) -> f64 {
        let annual = match self.variant {
            Variant::Checking | Variant::CollegeChecking { .. } => CHECKING_RATE,
            Variant::Savings { loyal } => SAVINGS_RATE + loyalty_bonus(loyal),
            Variant::MoneyMarket { loyal, .. } => MONEY_MARKET_RATE + loyalty_bonus(loyal),
        };
        round_cents(self.balance * (annual / 12.0))
    }

    pub fn monthly_fee(&self) -> f64 {
        let fee = match self.variant {
            Variant::Checking if self.balance >= CHECKING_FEE_WAIVER => 0.0,
            Variant::Checking => CHECKING_FEE,
            Variant::CollegeChecking { .. } => 0.0,
            Variant::Savings { .. } if self.balance >= SAVINGS_FEE_WAIVER => 0.0,
            Variant::Savings { .. } => SAVINGS_FEE,
            Variant::MoneyMarket { withdrawals, .. } => {
                if self.balance < MONEY_MARKET_MINIMUM || withdrawals > MONEY_MARKET_FREE_WITHDRAWALS {
                    MONEY_MARKET_FEE
                } else {
                    0.0
                }
            }
        };
        round_cents(fee)
    }

    pub fn deposit(&mut self, amount: f64) {
        self.balance += amount;
        self.refresh_loyalty();
    }

    /// Leaves the balance untouched unless something strictly positive would
    /// remain.
    pub fn withdraw(&mut self, amount: f64) -> WithdrawOutcome {
        if self.balance - amount <= 0.0 {
            log::debug!("{}: insufficient funds for {amount}", self.key());
            return WithdrawOutcome::InsufficientFunds;
        }
        self.balance -= amount;
        if let Variant::MoneyMarket { withdrawals, .. } = &mut self.variant {
            *withdrawals += 1;
        }
        self.refresh_loyalty();
        WithdrawOutcome::Withdrawn
    }

    /// Apply one period's interest and fee, then reset per-period counters.
    pub fn apply_period_close(&mut self) {
        let interest = self.monthly_interest();
        let fee = self.monthly_fee();
        self.balance += interest - fee;
        if let Variant::MoneyMarket { withdrawals, .. } = &mut self.variant {
            *withdrawals = 0;
        }
        self.refresh_loyalty();
    }

    fn refresh_loyalty(&mut self) {
        let balance = self.balance;
        if let Variant::MoneyMarket { loyal, .. } = &mut self.variant {
            *loyal = balance >= MONEY_MARKET_MINIMUM;
        }
    }

    pub fn display(&self) -> String {
        let mut out = format!(
            "{}::{}::Balance {}",
            self.account_type().label(),
            self.holder,
            money(self.balance)
        );
        match self.variant {
            Variant::Checking => {}
            Variant::CollegeChecking { campus } => {
                out.push_str("::");
                out.push_str(campus.name());
            }
            Variant::Savings { loyal } => {
                if loyal {
                    out.push_str("::is loyal");
                }
            }
            Variant::MoneyMarket { loyal, withdrawals } => {
                if loyal {
                    out.push_str("::is loyal");
                }
                out.push_str(&format!("::withdrawal: {withdrawals}"));
            }
        }
        out
    }

    pub fn fee_and_interest_line(&self) -> String {
        format!(
            "{}::fee {}::monthly interest {}",
            self.display(),
            money(self.monthly_fee()),
            money(self.monthly_interest())
        )
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn require_positive(balance: f64) -> Result<(), Rejection> {
    if balance <= 0.0 {
        return Err(Rejection::NonPositiveDeposit);
    }
    Ok(())
}

fn loyalty_bonus(loyal: bool) -> f64 {
    if loyal {
        LOYALTY_BONUS
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Open requests
// ---------------------------------------------------------------------------

/// Everything needed to open one account, as collected by a UI or a loader.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub account_type: AccountType,
    pub holder: Profile,
    pub amount: f64,
    pub campus: Option<i32>,
    pub loyal: bool,
}

impl OpenRequest {
    /// Validate the holder's date of birth, then build the variant.
    pub fn build_on(self, today: NaiveDate) -> Result<Account, Rejection> {
        self.holder
            .dob()
            .validate_on(today)
            .map_err(Rejection::InvalidDob)?;
        match self.account_type {
            AccountType::Checking => Account::checking(self.holder, self.amount),
            AccountType::CollegeChecking => {
                require_positive(self.amount)?;
                let campus = self.campus.ok_or(Rejection::MissingCampus)?;
                Account::college_checking_on(self.holder, self.amount, campus, today)
            }
            AccountType::Savings => Account::savings(self.holder, self.amount, self.loyal),
            AccountType::MoneyMarket => Account::money_market(self.holder, self.amount),
        }
    }

    #[allow(dead_code)]
    pub fn build(self) -> Result<Account, Rejection> {
        self.build_on(today())
    }
}
