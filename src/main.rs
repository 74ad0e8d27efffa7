mod account;
mod cli;
mod date;
mod error;
mod fmt;
mod loader;
mod profile;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let settings = settings::load_settings();
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Init {
            load_file,
            monochrome,
        } => cli::init::run(load_file, monochrome),
        Commands::Session { script } => cli::session::run(script.as_deref(), &settings),
        Commands::Load { file, report, table } => cli::load::run(&file, report, table),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
