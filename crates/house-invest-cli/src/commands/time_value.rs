use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use house_invest_core::time_value::{self, InvestTiming};

use crate::input;

/// Arguments for the closed-form regular investment total
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RegularInvestmentArgs {
    /// Amount invested at the end of every period
    #[arg(long)]
    pub contribution: Decimal,

    /// Growth rate per period (e.g. 0.0066 for 8% a year paid monthly)
    #[arg(long)]
    pub rate: Decimal,

    /// Number of periods
    #[arg(long)]
    pub periods: u32,
}

/// Arguments for accumulating an arbitrary series of investments
#[derive(Args)]
pub struct AccumulateArgs {
    /// Path to JSON/YAML file with `invest`, `rate` and optional `timing`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct AccumulationInput {
    invest: Vec<Decimal>,
    rate: Vec<Decimal>,
    #[serde(default)]
    timing: InvestTiming,
}

pub fn run_regular_investment(
    args: RegularInvestmentArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let total = time_value::regular_investment_total(args.contribution, args.rate, args.periods)?;
    Ok(json!({
        "result": {
            "total": total,
            "contribution": args.contribution,
            "rate": args.rate,
            "periods": args.periods,
        }
    }))
}

pub fn run_accumulate(args: AccumulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let acc_input: AccumulationInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for accumulate".into());
    };
    let values = time_value::series_values(&acc_input.invest, &acc_input.rate, acc_input.timing)?;
    let total = values.last().copied().unwrap_or_default();
    Ok(json!({
        "result": {
            "total": total,
            "timing": acc_input.timing,
            "values": values,
        }
    }))
}
