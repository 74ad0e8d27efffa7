use std::cmp::Ordering;

use crate::account::{Account, AccountKey, Transaction, WithdrawOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Opened,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStatus {
    Closed,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositStatus {
    Deposited,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawStatus {
    Withdrawn,
    InsufficientFunds,
    NotFound,
}

/// In-memory account database. Lookups use the holder/type identity rule,
/// so a Checking and a College Checking for one holder are the same account.
///
/// Iteration order is insertion order until [`AccountStore::sort`] runs.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn find(&self, key: &AccountKey) -> Option<usize> {
        self.accounts.iter().position(|a| a.matches(key))
    }

    pub fn contains(&self, key: &AccountKey) -> bool {
        self.find(key).is_some()
    }

    #[allow(dead_code)]
    pub fn get(&self, key: &AccountKey) -> Option<&Account> {
        self.find(key).map(|i| &self.accounts[i])
    }

    pub fn open(&mut self, account: Account) -> OpenStatus {
        let key = account.key();
        if self.contains(&key) {
            log::debug!("{key} already open");
            return OpenStatus::Duplicate;
        }
        log::debug!("opening {key}");
        self.accounts.push(account);
        OpenStatus::Opened
    }

    /// Remove the matching account, keeping the others in order.
    pub fn close(&mut self, key: &AccountKey) -> CloseStatus {
        match self.find(key) {
            Some(i) => {
                let removed = self.accounts.remove(i);
                log::debug!("closed {}", removed.key());
                CloseStatus::Closed
            }
            None => CloseStatus::NotFound,
        }
    }

    pub fn deposit(&mut self, txn: &Transaction) -> DepositStatus {
        let Some(i) = self.find(&txn.key) else {
            return DepositStatus::NotFound;
        };
        self.accounts[i].deposit(txn.amount);
        log::debug!("deposited {} into {}", txn.amount, txn.key);
        DepositStatus::Deposited
    }

    pub fn withdraw(&mut self, txn: &Transaction) -> WithdrawStatus {
        let Some(i) = self.find(&txn.key) else {
            return WithdrawStatus::NotFound;
        };
        match self.accounts[i].withdraw(txn.amount) {
            WithdrawOutcome::Withdrawn => {
                log::debug!("withdrew {} from {}", txn.amount, txn.key);
                WithdrawStatus::Withdrawn
            }
            WithdrawOutcome::InsufficientFunds => WithdrawStatus::InsufficientFunds,
        }
    }

    /// Order by type code, then holder.
    pub fn sort(&mut self) {
        quicksort(&mut self.accounts);
    }

    pub fn apply_period_close(&mut self) {
        for account in &mut self.accounts {
            account.apply_period_close();
        }
        log::debug!("period closed for {} accounts", self.accounts.len());
    }

    /// Current accounts in insertion (or last sorted) order.
    #[allow(dead_code)]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn sorted_accounts(&mut self) -> &[Account] {
        self.sort();
        &self.accounts
    }

    pub fn fee_and_interest_report(&mut self) -> Vec<String> {
        self.sort();
        self.accounts.iter().map(Account::fee_and_interest_line).collect()
    }

    /// Close the period on every account, then report fees and interest for
    /// the next one.
    pub fn update_balances(&mut self) -> Vec<String> {
        self.apply_period_close();
        self.fee_and_interest_report()
    }
}

// ---------------------------------------------------------------------------
// Partition-exchange sort, pivot on the first element of each range
// ---------------------------------------------------------------------------

fn quicksort(accounts: &mut [Account]) {
    if accounts.len() < 2 {
        return;
    }
    let pivot = partition(accounts);
    let (left, right) = accounts.split_at_mut(pivot);
    quicksort(left);
    quicksort(&mut right[1..]);
}

fn partition(accounts: &mut [Account]) -> usize {
    let mut l = 1;
    let mut r = accounts.len() - 1;
    loop {
        while l <= r && accounts[l].cmp_by_type_and_holder(&accounts[0]) != Ordering::Greater {
            l += 1;
        }
        while r >= l && accounts[r].cmp_by_type_and_holder(&accounts[0]) == Ordering::Greater {
            r -= 1;
        }
        if l < r {
            accounts.swap(l, r);
        } else {
            break;
        }
    }
    accounts.swap(0, r);
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::date::Date;
    use crate::profile::Profile;

    fn person(first: &str, last: &str) -> Profile {
        Profile::new(first, last, Date::new(1990, 1, 1))
    }

    fn key(first: &str, last: &str, account_type: AccountType) -> AccountKey {
        AccountKey::new(person(first, last), account_type)
    }

    fn txn(first: &str, last: &str, account_type: AccountType, amount: f64) -> Transaction {
        Transaction::new(key(first, last, account_type), amount).unwrap()
    }

    fn codes(store: &AccountStore) -> Vec<String> {
        store
            .accounts()
            .iter()
            .map(|a| format!("{} {}", a.type_code(), a.holder().last_name()))
            .collect()
    }

    #[test]
    fn test_open_and_contains() {
        let mut store = AccountStore::new();
        assert!(store.is_empty());
        let acct = Account::checking(person("Jane", "Doe"), 500.0).unwrap();
        assert_eq!(store.open(acct), OpenStatus::Opened);
        assert!(store.contains(&key("jane", "DOE", AccountType::Checking)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_checking_and_college_checking_collide() {
        let mut store = AccountStore::new();
        let profile = Profile::new("Roy", "Brooks", Date::new(2003, 10, 31));
        store.open(Account::checking(profile.clone(), 100.0).unwrap());
        assert!(store.contains(&AccountKey::new(profile.clone(), AccountType::CollegeChecking)));
        assert!(!store.contains(&AccountKey::new(profile.clone(), AccountType::Savings)));

        assert_eq!(
            store.open(Account::savings(profile.clone(), 100.0, false).unwrap()),
            OpenStatus::Opened
        );
        assert_eq!(
            store.open(Account::checking(profile, 5.0).unwrap()),
            OpenStatus::Duplicate
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_close_preserves_order() {
        let mut store = AccountStore::new();
        for last in ["A", "B", "C", "D", "E"] {
            store.open(Account::checking(person("X", last), 10.0).unwrap());
        }
        assert_eq!(store.close(&key("X", "B", AccountType::Checking)), CloseStatus::Closed);
        assert_eq!(codes(&store), vec!["C A", "C C", "C D", "C E"]);
        assert!(!store.contains(&key("X", "B", AccountType::Checking)));
        assert_eq!(store.close(&key("X", "B", AccountType::Checking)), CloseStatus::NotFound);
    }

    #[test]
    fn test_close_college_checking_by_checking_key() {
        let mut store = AccountStore::new();
        let profile = Profile::new("Roy", "Brooks", Date::new(2003, 10, 31));
        let today = chrono::NaiveDate::from_ymd_opt(2023, 10, 18).unwrap();
        store.open(Account::college_checking_on(profile.clone(), 10.0, 2, today).unwrap());
        assert_eq!(
            store.close(&AccountKey::new(profile, AccountType::Checking)),
            CloseStatus::Closed
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let mut store = AccountStore::new();
        store.open(Account::money_market(person("Jane", "Doe"), 2500.0).unwrap());

        assert_eq!(
            store.deposit(&txn("Jane", "Doe", AccountType::MoneyMarket, 100.0)),
            DepositStatus::Deposited
        );
        assert_eq!(
            store.withdraw(&txn("Jane", "Doe", AccountType::MoneyMarket, 700.0)),
            WithdrawStatus::Withdrawn
        );
        assert_eq!(
            store.withdraw(&txn("Jane", "Doe", AccountType::MoneyMarket, 1900.0)),
            WithdrawStatus::InsufficientFunds
        );
        assert_eq!(
            store.deposit(&txn("Jane", "Doe", AccountType::Savings, 1.0)),
            DepositStatus::NotFound
        );
        assert_eq!(
            store.withdraw(&txn("John", "Doe", AccountType::MoneyMarket, 1.0)),
            WithdrawStatus::NotFound
        );

        let acct = store.get(&key("Jane", "Doe", AccountType::MoneyMarket)).unwrap();
        assert_eq!(acct.balance(), 1900.0);
        assert_eq!(acct.withdrawals(), 1);
        assert!(!acct.is_loyal());
    }

    #[test]
    fn test_sort_by_type_code_then_profile() {
        let mut store = AccountStore::new();
        store.open(Account::savings(person("A", "Zed"), 10.0, false).unwrap());
        store.open(Account::money_market(person("A", "Young"), 2000.0).unwrap());
        store.open(Account::checking(person("A", "Mills"), 10.0).unwrap());
        store.open(Account::savings(person("A", "Adams"), 10.0, true).unwrap());
        store.open(Account::checking(person("A", "Baker"), 10.0).unwrap());
        let today = chrono::NaiveDate::from_ymd_opt(2023, 10, 18).unwrap();
        let student = Profile::new("A", "Cole", Date::new(2003, 1, 1));
        store.open(Account::college_checking_on(student, 10.0, 0, today).unwrap());
        store.open(Account::money_market(person("A", "Allen"), 2000.0).unwrap());

        store.sort();
        assert_eq!(
            codes(&store),
            vec!["C Baker", "C Mills", "CC Cole", "MM Allen", "MM Young", "S Adams", "S Zed"]
        );
    }

    #[test]
    fn test_sort_handles_reverse_and_sorted_input() {
        let names = ["E", "D", "C", "B", "A", "F", "G"];
        let mut store = AccountStore::new();
        for last in names {
            store.open(Account::checking(person("X", last), 10.0).unwrap());
        }
        store.sort();
        assert_eq!(
            codes(&store),
            vec!["C A", "C B", "C C", "C D", "C E", "C F", "C G"]
        );
        store.sort();
        assert_eq!(
            codes(&store),
            vec!["C A", "C B", "C C", "C D", "C E", "C F", "C G"]
        );
    }

    #[test]
    fn test_apply_period_close_keeps_order() {
        let mut store = AccountStore::new();
        store.open(Account::savings(person("A", "Zed"), 1200.0, false).unwrap());
        store.open(Account::checking(person("Jane", "Doe"), 500.0).unwrap());
        store.apply_period_close();
        assert_eq!(codes(&store), vec!["S Zed", "C Doe"]);
        assert_eq!(store.accounts()[0].balance(), 1204.0);
        assert_eq!(store.accounts()[1].balance(), 488.42);
    }

    #[test]
    fn test_fee_and_interest_report_is_sorted() {
        let mut store = AccountStore::new();
        store.open(Account::savings(person("A", "Zed"), 1200.0, false).unwrap());
        store.open(Account::checking(person("Jane", "Doe"), 500.0).unwrap());
        let report = store.fee_and_interest_report();
        assert_eq!(
            report,
            vec![
                "Checking::Jane Doe 1/1/1990::Balance $500.00::fee $12.00::monthly interest $0.42",
                "Savings::A Zed 1/1/1990::Balance $1,200.00::fee $0.00::monthly interest $4.00",
            ]
        );
    }

    #[test]
    fn test_update_balances_reports_new_state() {
        let mut store = AccountStore::new();
        store.open(Account::checking(person("Jane", "Doe"), 500.0).unwrap());
        let report = store.update_balances();
        assert_eq!(
            report,
            vec!["Checking::Jane Doe 1/1/1990::Balance $488.42::fee $12.00::monthly interest $0.41"]
        );
    }

    #[test]
    fn test_sorted_accounts_on_empty_store() {
        let mut store = AccountStore::new();
        assert!(store.sorted_accounts().is_empty());
        assert!(store.fee_and_interest_report().is_empty());
    }
}
