use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter;
use tracing::debug;

use super::scenario::HouseScenario;
use crate::mortgage::payment::mortgage_payment;
use crate::time_value::{
    compound_path, inflation_adjust, overflow_error, scale_path, series_values, zip_with,
    InvestTiming,
};
use crate::types::{Money, Series};
use crate::HouseInvestResult;

/// Month-by-month view of a rental property. Every series holds one entry
/// per month of the horizon (mortgage plus years after pay off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseInvestmentSeries {
    /// Fixed monthly mortgage payment
    pub monthly_payment: Money,
    /// House value minus remaining loan
    pub equity: Series,
    /// Net rental income minus costs, negative when the owner subsidises the house
    pub monthly_income: Series,
    pub house_value: Series,
    pub loan_remaining: Series,
    /// Rent after fees, vacancy and income tax
    pub rental_income: Series,
    /// Inflated running costs net of deductions, plus the mortgage payment
    pub total_cost: Series,
}

/// Equity and net monthly cash flow of a rented house.
///
/// The loan balance is rebuilt as the gap between the loan left to grow at
/// the mortgage rate and a side account collecting the payments at the same
/// rate. The mortgage payment is counted through zero-based month
/// `n_months_repay` inclusive.
pub fn house_investment(scenario: &HouseScenario) -> HouseInvestResult<HouseInvestmentSeries> {
    scenario.validate()?;
    house_investment_unchecked(scenario)
}

/// [`house_investment`] for a scenario the caller has already validated.
pub(super) fn house_investment_unchecked(
    scenario: &HouseScenario,
) -> HouseInvestResult<HouseInvestmentSeries> {
    let n_months_repay = scenario.n_months_repay() as usize;
    let n_total_months = scenario.n_total_months() as usize;
    let loan_amount = scenario.loan_amount();
    let twelve = Decimal::from(12);

    let monthly_payment = mortgage_payment(&scenario.mortgage_terms())?;
    debug!(%monthly_payment, n_months_repay, n_total_months, "modelling house investment");

    // Rental deductions offset part of the running costs
    let yearly_cost = scenario
        .yearly_tax
        .checked_add(scenario.yearly_insurance)
        .and_then(|cost| cost.checked_add(scenario.yearly_repair))
        .ok_or_else(|| overflow_error("yearly_repair", 0))?;
    let extra_cost_per_month = yearly_cost / twelve;
    let deductible_share = Decimal::ONE - scenario.percentage_rented * scenario.income_tax;
    let total_cost: Series = inflation_adjust(
        iter::repeat(extra_cost_per_month).take(n_total_months),
        scenario.inflation_rate,
    )
    .enumerate()
    .map(|(month, cost)| {
        let cost = cost? * deductible_share;
        if month <= n_months_repay {
            cost.checked_add(monthly_payment)
                .ok_or_else(|| overflow_error("monthly_payment", month))
        } else {
            Ok(cost)
        }
    })
    .collect::<HouseInvestResult<_>>()?;

    // Rent rises with the property value
    let estate_growth = compound_path(scenario.estate_rate / twelve, n_total_months)?;
    let net_rent = scenario.monthly_rent
        * (Decimal::ONE - scenario.management_fee)
        * scenario.percentage_rented
        * (Decimal::ONE - scenario.income_tax);
    let rental_income = scale_path(net_rent, &estate_growth, "monthly_rent")?;

    let monthly_income = zip_with(
        &rental_income,
        &total_cost,
        "monthly_income",
        Decimal::checked_sub,
    )?;

    let house_value = scale_path(scenario.house_cost, &estate_growth, "house_cost")?;

    let monthly_mortgage_rate = scenario.mortgage_rate / twelve;
    let unrepaid_loan = scale_path(
        loan_amount,
        &compound_path(monthly_mortgage_rate, n_months_repay)?,
        "house_cost",
    )?;
    let repaid_total = series_values(
        &vec![monthly_payment; n_months_repay],
        &vec![monthly_mortgage_rate; n_months_repay],
        InvestTiming::EndOfPeriod,
    )?;
    let mut loan_remaining = zip_with(
        &unrepaid_loan,
        &repaid_total,
        "loan_remaining",
        Decimal::checked_sub,
    )?;
    loan_remaining.resize(n_total_months, Decimal::ZERO);

    let equity = zip_with(&house_value, &loan_remaining, "equity", Decimal::checked_sub)?;

    Ok(HouseInvestmentSeries {
        monthly_payment,
        equity,
        monthly_income,
        house_value,
        loan_remaining,
        rental_income,
        total_cost,
    })
}
