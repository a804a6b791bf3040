use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use house_invest_core::mortgage::amortization::{self, AmortizationInput};
use house_invest_core::mortgage::payment::{self, MortgageTerms};

use crate::input;

/// Arguments for the fixed mortgage payment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Yearly mortgage rate (e.g. 0.025 for 2.5%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Years to repay the loan
    #[arg(long, alias = "years")]
    pub years_to_maturity: Option<u32>,

    /// Payments per year
    #[arg(long, default_value = "12")]
    pub payments_per_year: u32,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizationArgs {
    /// Yearly mortgage rate (e.g. 0.025 for 2.5%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Years to repay the loan
    #[arg(long, alias = "years")]
    pub years_to_maturity: Option<u32>,

    /// Payments per year
    #[arg(long, default_value = "12")]
    pub payments_per_year: u32,

    /// Equity held at the start, e.g. the down payment
    #[arg(long, default_value = "0")]
    pub initial_equity: Decimal,

    /// Yearly growth of the property value
    #[arg(long)]
    pub estate_growth_rate: Option<Decimal>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: MortgageTerms = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        MortgageTerms {
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            years_to_maturity: args
                .years_to_maturity
                .ok_or("--years-to-maturity is required (or provide --input)")?,
            payments_per_year: args.payments_per_year,
        }
    };
    let result = payment::calculate_mortgage_payment(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AmortizationInput {
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            years_to_maturity: args
                .years_to_maturity
                .ok_or("--years-to-maturity is required (or provide --input)")?,
            payments_per_year: args.payments_per_year,
            initial_equity: args.initial_equity,
            estate_growth_rate: args.estate_growth_rate,
        }
    };
    let result = amortization::build_amortization_schedule(&amort_input)?;
    Ok(serde_json::to_value(result)?)
}
