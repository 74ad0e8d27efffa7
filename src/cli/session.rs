use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use csv::StringRecord;

use crate::account::{AccountKey, AccountType, Transaction};
use crate::cli::load::write_summary;
use crate::cli::{report, ReportKind};
use crate::date::{today, Date};
use crate::error::{Result, TellerError};
use crate::loader::{self, parse_amount, parse_record, LoadError};
use crate::profile::Profile;
use crate::settings::{shellexpand_path, Settings};
use crate::store::{AccountStore, CloseStatus, DepositStatus, OpenStatus, WithdrawStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A line-oriented transaction session over one in-memory store.
pub struct Session<W: Write> {
    store: AccountStore,
    today: NaiveDate,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, today: NaiveDate) -> Self {
        Self {
            store: AccountStore::new(),
            today,
            out,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        writeln!(self.out, "Transaction Manager is running.")?;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let Ok(line) = std::str::from_utf8(&buf) else {
                self.reject(&"Command line is not valid UTF-8.")?;
                continue;
            };
            match self.execute(line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(self.out, "{}", e.to_string().red())?,
            }
        }
        writeln!(self.out, "Transaction Manager is terminated.")?;
        Ok(())
    }

    /// Run one command line. Blank lines are ignored.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };
        match *command {
            "O" => self.open(args)?,
            "C" => self.close(args)?,
            "D" => self.deposit(args)?,
            "W" => self.withdraw(args)?,
            "P" => self.report(ReportKind::Accounts)?,
            "PI" => self.report(ReportKind::Fees)?,
            "UB" => self.report(ReportKind::Update)?,
            "L" => match args.first() {
                Some(path) => self.load_path(path)?,
                None => self.reject(&LoadError::Incomplete)?,
            },
            "Q" => return Ok(Flow::Quit),
            other => return Err(TellerError::UnknownCommand(other.to_string())),
        }
        Ok(Flow::Continue)
    }

    fn reject(&mut self, reason: &dyn std::fmt::Display) -> Result<()> {
        writeln!(self.out, "{}", reason.to_string().red())?;
        Ok(())
    }

    fn open(&mut self, args: &[&str]) -> Result<()> {
        let request = match parse_record(&StringRecord::from(args.to_vec())) {
            Ok(request) => request,
            Err(e) => return self.reject(&e),
        };
        let account = match request.build_on(self.today) {
            Ok(account) => account,
            Err(e) => return self.reject(&e),
        };
        let key = account.key();
        match self.store.open(account) {
            OpenStatus::Opened => writeln!(self.out, "{key} opened.")?,
            OpenStatus::Duplicate => self.reject(&format!("{key} is already in the database."))?,
        }
        Ok(())
    }

    fn close(&mut self, args: &[&str]) -> Result<()> {
        let key = match parse_key(args) {
            Ok(key) => key,
            Err(e) => return self.reject(&e),
        };
        match self.store.close(&key) {
            CloseStatus::Closed => writeln!(self.out, "{key} has been closed.")?,
            CloseStatus::NotFound => self.reject(&format!("{key} is not in the database."))?,
        }
        Ok(())
    }

    fn deposit(&mut self, args: &[&str]) -> Result<()> {
        let txn = match parse_transaction(args) {
            Ok(txn) => txn,
            Err(e) => return self.reject(&e),
        };
        let key = &txn.key;
        match self.store.deposit(&txn) {
            DepositStatus::Deposited => writeln!(self.out, "{key} Deposit - balance updated.")?,
            DepositStatus::NotFound => self.reject(&format!("{key} is not in the database."))?,
        }
        Ok(())
    }

    fn withdraw(&mut self, args: &[&str]) -> Result<()> {
        let txn = match parse_transaction(args) {
            Ok(txn) => txn,
            Err(e) => return self.reject(&e),
        };
        let key = &txn.key;
        match self.store.withdraw(&txn) {
            WithdrawStatus::Withdrawn => writeln!(self.out, "{key} Withdraw - balance updated.")?,
            WithdrawStatus::InsufficientFunds => {
                self.reject(&format!("{key} Withdraw - insufficient fund."))?
            }
            WithdrawStatus::NotFound => self.reject(&format!("{key} is not in the database."))?,
        }
        Ok(())
    }

    fn report(&mut self, kind: ReportKind) -> Result<()> {
        for line in report::lines(kind, &mut self.store) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    pub fn load_path(&mut self, path: &str) -> Result<()> {
        let path = PathBuf::from(shellexpand_path(path));
        let result = loader::load_file(&path, &mut self.store, self.today)?;
        write_summary(&mut self.out, &result)?;
        Ok(())
    }
}

fn parse_key(args: &[&str]) -> std::result::Result<AccountKey, LoadError> {
    if args.len() < 4 {
        return Err(LoadError::Incomplete);
    }
    let account_type: AccountType = args[0].parse().map_err(LoadError::UnknownType)?;
    let dob = Date::parse(args[3]).ok_or_else(|| LoadError::BadDate(args[3].to_string()))?;
    Ok(AccountKey::new(Profile::new(args[1], args[2], dob), account_type))
}

fn parse_transaction(args: &[&str]) -> std::result::Result<Transaction, LoadError> {
    if args.len() < 5 {
        return Err(LoadError::Incomplete);
    }
    let key = parse_key(args)?;
    let amount = parse_amount(args[4]).ok_or_else(|| LoadError::BadAmount(args[4].to_string()))?;
    Ok(Transaction::new(key, amount)?)
}

pub fn run(script: Option<&str>, settings: &Settings) -> Result<()> {
    let stdout = std::io::stdout();
    let mut session = Session::new(stdout.lock(), today());

    if let Some(path) = &settings.load_file {
        if let Err(e) = session.load_path(path) {
            log::warn!("could not load {path}: {e}");
            eprintln!("{}", format!("Could not load {path}: {e}").red());
        }
    }

    match script {
        Some(path) => {
            let file = std::fs::File::open(shellexpand_path(path))?;
            session.run(BufReader::new(file))
        }
        None => session.run(std::io::stdin().lock()),
    }
}
