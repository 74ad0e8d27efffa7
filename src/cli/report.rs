use comfy_table::{Cell, Table};

use crate::account::{Account, Variant};
use crate::cli::ReportKind;
use crate::fmt::money;
use crate::store::AccountStore;

pub const EMPTY: &str = "Account Database is empty!";
const END: &str = "*end of list.";

fn bracket(header: &str, body: Vec<String>) -> Vec<String> {
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(header.to_string());
    lines.extend(body);
    lines.push(END.to_string());
    lines
}

/// The report as printable lines. `Update` closes the period first.
pub fn lines(kind: ReportKind, store: &mut AccountStore) -> Vec<String> {
    if store.is_empty() {
        return vec![EMPTY.to_string()];
    }
    match kind {
        ReportKind::Accounts => {
            let body = store.sorted_accounts().iter().map(Account::display).collect();
            bracket("*Accounts sorted by account type and profile.", body)
        }
        ReportKind::Fees => bracket(
            "*list of accounts with fee and monthly interest",
            store.fee_and_interest_report(),
        ),
        ReportKind::Update => bracket(
            "*list of accounts with fees and interests applied.",
            store.update_balances(),
        ),
    }
}

fn details(account: &Account) -> String {
    match account.variant() {
        Variant::Checking => String::new(),
        Variant::CollegeChecking { campus } => campus.name().to_string(),
        Variant::Savings { loyal } => (if *loyal { "loyal" } else { "" }).to_string(),
        Variant::MoneyMarket { loyal, withdrawals } => {
            let loyal = if *loyal { "loyal, " } else { "" };
            format!("{loyal}{withdrawals} withdrawals")
        }
    }
}

/// The report as a table. `Update` closes the period first.
pub fn table(kind: ReportKind, store: &mut AccountStore) -> Table {
    if kind == ReportKind::Update {
        store.apply_period_close();
    }
    let mut table = Table::new();
    table.set_header(vec!["Type", "Holder", "Balance", "Fee", "Interest", "Details"]);
    for account in store.sorted_accounts() {
        table.add_row(vec![
            Cell::new(account.type_code()),
            Cell::new(account.holder()),
            Cell::new(money(account.balance())),
            Cell::new(money(account.monthly_fee())),
            Cell::new(money(account.monthly_interest())),
            Cell::new(details(account)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Date;
    use crate::profile::Profile;

    fn store() -> AccountStore {
        let mut store = AccountStore::new();
        let jane = Profile::new("Jane", "Doe", Date::new(1990, 1, 1));
        store.open(Account::savings(jane.clone(), 1200.0, true).unwrap());
        store.open(Account::checking(jane, 500.0).unwrap());
        store
    }

    #[test]
    fn test_empty_store() {
        let mut empty = AccountStore::new();
        assert_eq!(lines(ReportKind::Accounts, &mut empty), vec![EMPTY]);
        assert_eq!(lines(ReportKind::Update, &mut empty), vec![EMPTY]);
    }

    #[test]
    fn test_accounts_report() {
        let mut store = store();
        assert_eq!(
            lines(ReportKind::Accounts, &mut store),
            vec![
                "*Accounts sorted by account type and profile.",
                "Checking::Jane Doe 1/1/1990::Balance $500.00",
                "Savings::Jane Doe 1/1/1990::Balance $1,200.00::is loyal",
                "*end of list.",
            ]
        );
    }

    #[test]
    fn test_update_report_applies_period_close() {
        let mut store = store();
        let out = lines(ReportKind::Update, &mut store);
        assert_eq!(out.len(), 4);
        assert!(out[1].starts_with("Checking::Jane Doe 1/1/1990::Balance $488.42"));
        assert!(out[2].starts_with("Savings::Jane Doe 1/1/1990::Balance $1,204.25"));
    }

    #[test]
    fn test_table_has_row_per_account() {
        let mut store = store();
        let rendered = table(ReportKind::Fees, &mut store).to_string();
        assert!(rendered.contains("Jane Doe 1/1/1990"));
        assert!(rendered.contains("$12.00"));
        assert!(rendered.contains("loyal"));
    }
}
