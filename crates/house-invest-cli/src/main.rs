mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::housing::HouseArgs;
use commands::mortgage::{AmortizationArgs, PaymentArgs};
use commands::time_value::{AccumulateArgs, RegularInvestmentArgs};

/// Mortgage amortization and house-versus-stock investment comparisons
#[derive(Parser)]
#[command(
    name = "house-invest",
    version,
    about = "Mortgage amortization and house-versus-stock investment comparisons",
    long_about = "Computes month-by-month equity and cash flow for a rented house bought \
                  with a mortgage, and compares it against investing the down payment in \
                  the stock market. All amounts use decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter written to stderr (e.g. debug, house_invest_core=debug)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed payment that fully amortizes a loan
    Payment(PaymentArgs),
    /// Period-by-period equity, interest and balance of a loan
    Amortization(AmortizationArgs),
    /// Closed-form total of a constant investment at a constant rate
    RegularInvestment(RegularInvestmentArgs),
    /// Running value of a series of investments with per-period rates
    Accumulate(AccumulateArgs),
    /// Rented house vs investing the down payment in the stock market
    House(HouseArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Amortization(args) => commands::mortgage::run_amortization(args),
        Commands::RegularInvestment(args) => commands::time_value::run_regular_investment(args),
        Commands::Accumulate(args) => commands::time_value::run_accumulate(args),
        Commands::House(args) => commands::housing::run_house(args),
        Commands::Version => {
            println!("house-invest {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
