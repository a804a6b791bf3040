use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use house_invest_core::housing::comparison;
use house_invest_core::housing::scenario::HouseScenario;

use crate::input;

/// Arguments for the house vs alternative investment comparison.
///
/// The scenario starts from `--input`, piped stdin, or the built-in defaults;
/// any flag given on the command line then overrides that field.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct HouseArgs {
    /// Path to JSON/YAML scenario file
    #[arg(long)]
    pub input: Option<String>,

    /// House price
    #[arg(long)]
    pub house_cost: Option<Decimal>,

    /// Down payment as a fraction of the price (e.g. 0.1 for 10%)
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    /// Yearly mortgage rate
    #[arg(long)]
    pub mortgage_rate: Option<Decimal>,

    /// Mortgage duration in years
    #[arg(long)]
    pub mortgage_years: Option<u32>,

    /// Years to model after pay off
    #[arg(long)]
    pub years_after_payoff: Option<u32>,

    /// Yearly property tax
    #[arg(long)]
    pub yearly_tax: Option<Decimal>,

    /// Yearly insurance cost
    #[arg(long)]
    pub yearly_insurance: Option<Decimal>,

    /// Yearly repair cost
    #[arg(long)]
    pub yearly_repair: Option<Decimal>,

    /// Average monthly rental income
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Fraction of the property rented out
    #[arg(long)]
    pub percentage_rented: Option<Decimal>,

    /// Yearly real estate market increase
    #[arg(long)]
    pub estate_rate: Option<Decimal>,

    /// Yearly inflation rate
    #[arg(long)]
    pub inflation_rate: Option<Decimal>,

    /// Income tax rate
    #[arg(long)]
    pub income_tax: Option<Decimal>,

    /// Management fee as a fraction of rent
    #[arg(long)]
    pub management_fee: Option<Decimal>,

    /// Yearly rate of the alternative investment
    #[arg(long, alias = "stock-rate")]
    pub stock_market_rate: Option<Decimal>,

    /// First month of ownership (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_house(args: HouseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut scenario: HouseScenario = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        HouseScenario::default()
    };
    apply_overrides(&mut scenario, &args);

    let result = comparison::analyze_house_vs_stock(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

fn apply_overrides(scenario: &mut HouseScenario, args: &HouseArgs) {
    if let Some(v) = args.house_cost {
        scenario.house_cost = v;
    }
    if let Some(v) = args.down_payment_pct {
        scenario.down_payment_pct = v;
    }
    if let Some(v) = args.mortgage_rate {
        scenario.mortgage_rate = v;
    }
    if let Some(v) = args.mortgage_years {
        scenario.mortgage_years = v;
    }
    if let Some(v) = args.years_after_payoff {
        scenario.years_after_payoff = v;
    }
    if let Some(v) = args.yearly_tax {
        scenario.yearly_tax = v;
    }
    if let Some(v) = args.yearly_insurance {
        scenario.yearly_insurance = v;
    }
    if let Some(v) = args.yearly_repair {
        scenario.yearly_repair = v;
    }
    if let Some(v) = args.monthly_rent {
        scenario.monthly_rent = v;
    }
    if let Some(v) = args.percentage_rented {
        scenario.percentage_rented = v;
    }
    if let Some(v) = args.estate_rate {
        scenario.estate_rate = v;
    }
    if let Some(v) = args.inflation_rate {
        scenario.inflation_rate = v;
    }
    if let Some(v) = args.income_tax {
        scenario.income_tax = v;
    }
    if let Some(v) = args.management_fee {
        scenario.management_fee = v;
    }
    if let Some(v) = args.stock_market_rate {
        scenario.stock_market_rate = v;
    }
    if args.start_date.is_some() {
        scenario.start_date = args.start_date;
    }
}
