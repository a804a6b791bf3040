use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::house_investment::{house_investment_unchecked, HouseInvestmentSeries};
use super::scenario::HouseScenario;
use crate::error::HouseInvestError;
use crate::time_value::{
    compound_path, overflow_error, scale_path, series_values, zip_with, InvestTiming,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Series};
use crate::HouseInvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cumulative value of the house against the same capital in the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentComparison {
    /// Equity plus positive cash flow reinvested at the market rate
    pub house_investment: Series,
    /// Down payment plus subsidised cash flow invested at the market rate
    pub alternative_investment: Series,
}

/// One month of the side-by-side schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseVsStockRow {
    /// One-based month number
    pub month: u32,
    /// End of the month the row covers, when a start date is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub house_value: Money,
    pub loan_remaining: Money,
    pub equity: Money,
    pub rental_income: Money,
    pub total_cost: Money,
    pub monthly_income: Money,
    pub house_investment: Money,
    pub alternative_investment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseVsStockSummary {
    pub final_house_investment: Money,
    pub final_alternative_investment: Money,
    /// House minus alternative at the end of the horizon
    pub house_advantage: Money,
    /// First month from which the house stays ahead until the end
    pub breakeven_month: Option<u32>,
    pub negative_cash_flow_months: u32,
    /// Sum of the owner's monthly top-ups
    pub total_subsidy: Money,
    /// Sum of the positive monthly cash flows
    pub total_surplus: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseVsStockOutput {
    pub monthly_payment: Money,
    pub loan_amount: Money,
    pub down_payment: Money,
    pub n_months_repay: u32,
    pub n_total_months: u32,
    pub summary: HouseVsStockSummary,
    pub equity: Series,
    pub monthly_income: Series,
    pub house_investment: Series,
    pub alternative_investment: Series,
    pub schedule: Vec<HouseVsStockRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare the house against investing the down payment in the market.
///
/// Positive cash flow is reinvested in the market and credited to the house.
/// Negative cash flow is money the owner would otherwise have invested, so it
/// is credited to the alternative as a contribution.
pub fn compare_house_invest_vs_stock(
    equity: &[Money],
    monthly_income: &[Money],
    stock_market_rate: Rate,
    down_payment: Money,
) -> HouseInvestResult<InvestmentComparison> {
    if equity.len() != monthly_income.len() {
        return Err(HouseInvestError::InvalidInput {
            field: "monthly_income".into(),
            reason: format!(
                "Expected one income per equity value ({}), got {}",
                equity.len(),
                monthly_income.len()
            ),
        });
    }

    let monthly_rate = stock_market_rate / Decimal::from(12);
    if monthly_rate <= Decimal::NEGATIVE_ONE {
        return Err(HouseInvestError::InvalidInput {
            field: "stock_market_rate".into(),
            reason: "Monthly market rate must be greater than -100%".into(),
        });
    }

    let n_months = monthly_income.len();
    let rates = vec![monthly_rate; n_months];

    let positive_income: Series = monthly_income
        .iter()
        .map(|inc| if *inc > Decimal::ZERO { *inc } else { Decimal::ZERO })
        .collect();
    let negative_income: Series = monthly_income
        .iter()
        .map(|inc| if *inc <= Decimal::ZERO { -*inc } else { Decimal::ZERO })
        .collect();

    let invested_surplus = series_values(&positive_income, &rates, InvestTiming::EndOfPeriod)?;
    let house_investment = zip_with(
        equity,
        &invested_surplus,
        "house_investment",
        Decimal::checked_add,
    )?;

    let invested_subsidy = series_values(&negative_income, &rates, InvestTiming::EndOfPeriod)?;
    let invested_down_payment =
        scale_path(down_payment, &compound_path(monthly_rate, n_months)?, "down_payment")?;
    let alternative_investment = zip_with(
        &invested_down_payment,
        &invested_subsidy,
        "alternative_investment",
        Decimal::checked_add,
    )?;

    Ok(InvestmentComparison {
        house_investment,
        alternative_investment,
    })
}

/// Run the house model and the market comparison for a scenario.
pub fn analyze_house_vs_stock(
    scenario: &HouseScenario,
) -> HouseInvestResult<ComputationOutput<HouseVsStockOutput>> {
    let start = Instant::now();
    let mut warnings = scenario.validate()?;

    let series = house_investment_unchecked(scenario)?;
    let comparison = compare_house_invest_vs_stock(
        &series.equity,
        &series.monthly_income,
        scenario.stock_market_rate,
        scenario.down_payment(),
    )?;

    let summary = summarise(&series, &comparison)?;
    let n_total_months = scenario.n_total_months();
    debug!(
        n_total_months,
        advantage = %summary.house_advantage,
        "compared house against alternative investment"
    );

    if scenario.loan_amount().is_zero() {
        warnings.push("Down payment covers the full price, no mortgage is modelled".into());
    }
    if summary.negative_cash_flow_months * 2 > n_total_months {
        warnings.push(format!(
            "Rent fails to cover costs in {} of {} months",
            summary.negative_cash_flow_months, n_total_months
        ));
    }
    if summary.breakeven_month.is_none() && n_total_months > 0 {
        warnings.push(format!(
            "House investment does not stay ahead of the alternative within {n_total_months} months"
        ));
    }

    let schedule = build_schedule(scenario.start_date, &series, &comparison);

    let output = HouseVsStockOutput {
        monthly_payment: series.monthly_payment,
        loan_amount: scenario.loan_amount(),
        down_payment: scenario.down_payment(),
        n_months_repay: scenario.n_months_repay(),
        n_total_months,
        summary,
        equity: series.equity,
        monthly_income: series.monthly_income,
        house_investment: comparison.house_investment,
        alternative_investment: comparison.alternative_investment,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "House investment vs market investment of the down payment (monthly)",
        scenario,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn summarise(
    series: &HouseInvestmentSeries,
    comparison: &InvestmentComparison,
) -> HouseInvestResult<HouseVsStockSummary> {
    let final_house_investment = comparison
        .house_investment
        .last()
        .copied()
        .unwrap_or_default();
    let final_alternative_investment = comparison
        .alternative_investment
        .last()
        .copied()
        .unwrap_or_default();

    // Month after the last one where the house trails
    let last_behind = comparison
        .house_investment
        .iter()
        .zip(&comparison.alternative_investment)
        .rposition(|(house, alt)| house < alt);
    let n_months = comparison.house_investment.len();
    let breakeven_month = match last_behind {
        None if n_months > 0 => Some(1),
        None => None,
        Some(idx) if idx + 1 < n_months => Some((idx + 2) as u32),
        Some(_) => None,
    };

    let mut negative_cash_flow_months = 0u32;
    let mut total_subsidy = Decimal::ZERO;
    let mut total_surplus = Decimal::ZERO;
    for (month, income) in series.monthly_income.iter().enumerate() {
        if *income < Decimal::ZERO {
            negative_cash_flow_months += 1;
            total_subsidy = total_subsidy
                .checked_sub(*income)
                .ok_or_else(|| overflow_error("total_subsidy", month))?;
        } else {
            total_surplus = total_surplus
                .checked_add(*income)
                .ok_or_else(|| overflow_error("total_surplus", month))?;
        }
    }

    let house_advantage = final_house_investment
        .checked_sub(final_alternative_investment)
        .ok_or_else(|| overflow_error("house_advantage", n_months))?;

    Ok(HouseVsStockSummary {
        final_house_investment,
        final_alternative_investment,
        house_advantage,
        breakeven_month,
        negative_cash_flow_months,
        total_subsidy,
        total_surplus,
    })
}

fn build_schedule(
    start_date: Option<NaiveDate>,
    series: &HouseInvestmentSeries,
    comparison: &InvestmentComparison,
) -> Vec<HouseVsStockRow> {
    (0..series.equity.len())
        .map(|i| HouseVsStockRow {
            month: (i + 1) as u32,
            date: start_date.and_then(|d| d.checked_add_months(Months::new((i + 1) as u32))),
            house_value: series.house_value[i],
            loan_remaining: series.loan_remaining[i],
            equity: series.equity[i],
            rental_income: series.rental_income[i],
            total_cost: series.total_cost[i],
            monthly_income: series.monthly_income[i],
            house_investment: comparison.house_investment[i],
            alternative_investment: comparison.alternative_investment[i],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
