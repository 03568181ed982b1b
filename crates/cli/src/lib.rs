pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "salonbook",
    about = "Salonbook operator CLI",
    long_about = "Quote bookings from the command line, resolve postcodes against the travel tiers, inspect effective configuration, and check runtime readiness.",
    after_help = "Examples:\n  salonbook doctor --json\n  salonbook config\n  salonbook quote booking.json\n  salonbook postcode \"CH1 4EY\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a booking request read from a JSON file and print the full breakdown")]
    Quote {
        #[arg(help = "Path to a JSON file containing one booking request body")]
        file: PathBuf,
    },
    #[command(about = "Resolve a postcode to its district, distance, and travel tier")]
    Postcode {
        #[arg(help = "UK postcode, full or outward district only")]
        postcode: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, pricing rules, catalogue integrity, and notify readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Quote { file } => commands::quote::run(&file),
        Command::Postcode { postcode } => commands::postcode::run(&postcode),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
