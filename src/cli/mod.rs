pub mod init;
pub mod load;
pub mod report;
pub mod session;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "teller", about = "Account ledger for a small bank.")]
pub struct Cli {
    /// Disable coloured output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save settings to ~/.config/teller/settings.json.
    Init {
        /// Accounts file to bulk-load at the start of every session
        #[arg(long = "load-file")]
        load_file: Option<String>,
        /// Turn coloured output off by default
        #[arg(long)]
        monochrome: bool,
    },
    /// Run a transaction session, reading commands from stdin or a script.
    Session {
        /// Read commands from this file instead of stdin
        #[arg(long)]
        script: Option<String>,
    },
    /// Bulk-load an accounts file and print a report.
    Load {
        /// Path to a file of type,first,last,dob,balance[,param] records
        file: String,
        /// Which report to print after loading
        #[arg(long, value_enum, default_value_t = ReportKind::Accounts)]
        report: ReportKind,
        /// Render the report as a table
        #[arg(long)]
        table: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Accounts sorted by type and holder
    Accounts,
    /// Fees and monthly interest
    Fees,
    /// Apply the period's interest and fees, then show fees and interest
    Update,
}
