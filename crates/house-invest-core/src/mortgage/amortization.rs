use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::{mortgage_payment, MortgageTerms};
use crate::error::HouseInvestError;
use crate::time_value::{compound_path, overflow_error, zip_with};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Series};
use crate::HouseInvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Period-aligned equity and interest series. Index 0 holds the starting
/// values, so each series has `n_periods + 1` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySchedule {
    pub equity: Series,
    pub interest_paid: Series,
    pub remaining_loan: Series,
}

/// Input for a full amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Yearly mortgage rate
    pub annual_rate: Rate,
    /// Initial amount borrowed
    pub loan_amount: Money,
    /// Years to repay the loan
    pub years_to_maturity: u32,
    /// Payments per year, typically 12
    #[serde(default = "default_payments_per_year")]
    pub payments_per_year: u32,
    /// Equity held at the start, e.g. the down payment
    #[serde(default)]
    pub initial_equity: Money,
    /// Expected yearly growth of the property value
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub estate_growth_rate: Option<Rate>,
}

fn default_payments_per_year() -> u32 {
    12
}

impl AmortizationInput {
    pub fn terms(&self) -> MortgageTerms {
        MortgageTerms {
            annual_rate: self.annual_rate,
            loan_amount: self.loan_amount,
            years_to_maturity: self.years_to_maturity,
            payments_per_year: self.payments_per_year,
        }
    }
}

/// A single period of the amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub equity: Money,
    pub interest_paid: Money,
    pub remaining_loan: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub periodic_payment: Money,
    pub n_periods: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub final_equity: Money,
    /// Should be zero up to decimal rounding
    pub final_balance: Money,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Equity and cumulative interest over the life of the loan.
///
/// Each period the interest on the remaining balance is charged, the rest of
/// the payment goes to principal and becomes equity. When an estate growth
/// rate is given, equity entry `k` is then scaled by
/// `(1 + rate / payments_per_year)^(k + 1)` for property appreciation.
pub fn equity_and_interest(
    terms: &MortgageTerms,
    initial_equity: Money,
    estate_growth_rate: Option<Rate>,
) -> HouseInvestResult<EquitySchedule> {
    let principal = mortgage_payment(terms)?;
    let n_periods = terms.n_periods() as usize;
    let period_interest_rate = terms.periodic_rate();

    let mut equity = initial_equity;
    let mut interest_paid = Decimal::ZERO;
    let mut remaining_loan = terms.loan_amount;

    let mut equity_over_time = Vec::with_capacity(n_periods + 1);
    let mut interest_over_time = Vec::with_capacity(n_periods + 1);
    let mut remaining_over_time = Vec::with_capacity(n_periods + 1);
    equity_over_time.push(equity);
    interest_over_time.push(interest_paid);
    remaining_over_time.push(remaining_loan);

    for period in 0..n_periods {
        let period_interest = remaining_loan * period_interest_rate;
        let repaid = principal - period_interest;
        remaining_loan -= repaid;
        interest_paid = interest_paid
            .checked_add(period_interest)
            .ok_or_else(|| overflow_error("loan_amount", period))?;
        equity = equity
            .checked_add(repaid)
            .ok_or_else(|| overflow_error("initial_equity", period))?;
        equity_over_time.push(equity);
        interest_over_time.push(interest_paid);
        remaining_over_time.push(remaining_loan);
    }

    if let Some(growth) = estate_growth_rate {
        let period_growth = growth / Decimal::from(terms.payments_per_year);
        if period_growth <= Decimal::NEGATIVE_ONE {
            return Err(HouseInvestError::InvalidInput {
                field: "estate_growth_rate".into(),
                reason: "Periodic estate growth must be greater than -100%".into(),
            });
        }
        let appreciation = compound_path(period_growth, equity_over_time.len())?;
        equity_over_time = zip_with(
            &equity_over_time,
            &appreciation,
            "estate_growth_rate",
            Decimal::checked_mul,
        )?;
    }

    Ok(EquitySchedule {
        equity: equity_over_time,
        interest_paid: interest_over_time,
        remaining_loan: remaining_over_time,
    })
}

/// Full amortization table with totals, wrapped with computation metadata.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> HouseInvestResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = input.terms();
    let periodic_payment = mortgage_payment(&terms)?;
    let schedule = equity_and_interest(&terms, input.initial_equity, input.estate_growth_rate)?;

    if input.initial_equity < Decimal::ZERO {
        warnings.push("Initial equity is negative: schedule starts underwater".into());
    }
    if input.estate_growth_rate.is_some_and(|g| g < Decimal::ZERO) {
        warnings.push("Negative estate growth rate: equity erodes with the property value".into());
    }

    let n_periods = terms.n_periods();
    let total_paid = periodic_payment
        .checked_mul(Decimal::from(n_periods))
        .ok_or_else(|| overflow_error("loan_amount", n_periods as usize))?;
    let rows: Vec<AmortizationRow> = schedule
        .equity
        .iter()
        .zip(&schedule.interest_paid)
        .zip(&schedule.remaining_loan)
        .enumerate()
        .map(|(period, ((equity, interest_paid), remaining_loan))| AmortizationRow {
            period: period as u32,
            equity: *equity,
            interest_paid: *interest_paid,
            remaining_loan: *remaining_loan,
        })
        .collect();

    let output = AmortizationOutput {
        periodic_payment,
        n_periods,
        total_interest: schedule.interest_paid.last().copied().unwrap_or_default(),
        total_paid,
        final_equity: schedule.equity.last().copied().unwrap_or_default(),
        final_balance: schedule.remaining_loan.last().copied().unwrap_or_default(),
        schedule: rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fixed-rate amortization schedule (iterative)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
