use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::HouseInvestError;
use crate::time_value::{compound, overflow_error, series_total, InvestTiming};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HouseInvestResult;

const MAX_YEARS_TO_MATURITY: u32 = 100;
const MAX_PAYMENTS_PER_YEAR: u32 = 365;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed-rate loan terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Yearly mortgage rate (e.g. 0.025 = 2.5%)
    pub annual_rate: Rate,
    /// Initial amount borrowed
    pub loan_amount: Money,
    /// Years to repay the loan
    pub years_to_maturity: u32,
    /// Payments per year at regular intervals, typically 12
    #[serde(default = "default_payments_per_year")]
    pub payments_per_year: u32,
}

fn default_payments_per_year() -> u32 {
    12
}

impl MortgageTerms {
    /// Monthly-paid loan.
    pub fn monthly(annual_rate: Rate, loan_amount: Money, years_to_maturity: u32) -> Self {
        Self {
            annual_rate,
            loan_amount,
            years_to_maturity,
            payments_per_year: default_payments_per_year(),
        }
    }

    pub fn n_periods(&self) -> u32 {
        self.years_to_maturity * self.payments_per_year
    }

    /// Rate charged per payment period. Only meaningful on validated terms.
    pub fn periodic_rate(&self) -> Rate {
        self.annual_rate / Decimal::from(self.payments_per_year)
    }

    pub fn validate(&self) -> HouseInvestResult<()> {
        if self.years_to_maturity == 0 {
            return Err(HouseInvestError::InvalidInput {
                field: "years_to_maturity".into(),
                reason: "Loan must run for at least 1 year".into(),
            });
        }
        if self.years_to_maturity > MAX_YEARS_TO_MATURITY {
            return Err(HouseInvestError::InvalidInput {
                field: "years_to_maturity".into(),
                reason: format!("Loan term cannot exceed {MAX_YEARS_TO_MATURITY} years"),
            });
        }
        if self.payments_per_year == 0 || self.payments_per_year > MAX_PAYMENTS_PER_YEAR {
            return Err(HouseInvestError::InvalidInput {
                field: "payments_per_year".into(),
                reason: format!("Payments per year must be between 1 and {MAX_PAYMENTS_PER_YEAR}"),
            });
        }
        if self.loan_amount < Decimal::ZERO {
            return Err(HouseInvestError::InvalidInput {
                field: "loan_amount".into(),
                reason: "Loan amount cannot be negative".into(),
            });
        }
        if self.annual_rate > Decimal::ONE {
            return Err(HouseInvestError::InvalidInput {
                field: "annual_rate".into(),
                reason: "Mortgage rate cannot exceed 100%".into(),
            });
        }
        if self.periodic_rate() <= Decimal::NEGATIVE_ONE {
            return Err(HouseInvestError::InvalidInput {
                field: "annual_rate".into(),
                reason: "Periodic mortgage rate must be greater than -100%".into(),
            });
        }
        Ok(())
    }
}

/// Payment summary for a fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgagePaymentOutput {
    /// Fixed payment that fully amortizes the loan
    pub periodic_payment: Money,
    /// Rate charged per payment period
    pub periodic_rate: Rate,
    /// Total number of payments
    pub n_periods: u32,
    /// Sum of all payments
    pub total_paid: Money,
    /// Interest share of all payments
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed periodic payment that fully repays the loan.
///
/// If nothing were repaid the loan would grow to `loan * (1 + r)^n`. Paying
/// `P` at the end of every period into a side account earning the loan rate
/// accumulates `P * S`, where `S` is what one unit per period grows to. The
/// loan is repaid when both match, so `P = loan * (1 + r)^n / S`.
pub fn mortgage_payment(terms: &MortgageTerms) -> HouseInvestResult<Money> {
    terms.validate()?;

    let n_periods = terms.n_periods();
    if terms.annual_rate.is_zero() {
        return Ok(terms.loan_amount / Decimal::from(n_periods));
    }

    let periodic_rate = terms.periodic_rate();
    let total_loan = terms
        .loan_amount
        .checked_mul(compound(periodic_rate, n_periods)?)
        .ok_or_else(|| overflow_error("loan_amount", n_periods as usize))?;

    // Sum of (1 + r)^k for k < n, at least 1 since r > -1
    let n = n_periods as usize;
    let unit_growth = series_total(
        &vec![Decimal::ONE; n],
        &vec![periodic_rate; n],
        InvestTiming::EndOfPeriod,
    )?;

    let payment = total_loan / unit_growth;
    debug!(%payment, n_periods, %periodic_rate, "derived mortgage payment");
    Ok(payment)
}

/// Payment plus loan totals, wrapped with computation metadata.
pub fn calculate_mortgage_payment(
    terms: &MortgageTerms,
) -> HouseInvestResult<ComputationOutput<MortgagePaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let periodic_payment = mortgage_payment(terms)?;
    let n_periods = terms.n_periods();
    let total_paid = periodic_payment
        .checked_mul(Decimal::from(n_periods))
        .ok_or_else(|| overflow_error("loan_amount", n_periods as usize))?;
    let total_interest = total_paid - terms.loan_amount;

    if terms.annual_rate < Decimal::ZERO {
        warnings.push("Negative mortgage rate: total paid is below the amount borrowed".into());
    }
    if terms.annual_rate > dec!(0.15) {
        warnings.push(format!(
            "Mortgage rate {:.2}% is above 15%, verify the rate is annual",
            terms.annual_rate * dec!(100)
        ));
    }

    let output = MortgagePaymentOutput {
        periodic_payment,
        periodic_rate: terms.periodic_rate(),
        n_periods,
        total_paid,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fixed-rate mortgage payment (side-account accumulation)",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
