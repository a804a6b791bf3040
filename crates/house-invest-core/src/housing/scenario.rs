use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HouseInvestError;
use crate::mortgage::payment::MortgageTerms;
use crate::types::{Money, Rate};
use crate::HouseInvestResult;

const MAX_YEARS: u32 = 100;

/// A rental-property scenario. Percentages are fractions (0.33 = 33%),
/// amounts are in currency units, rates are yearly.
///
/// Every field falls back to its default when missing from a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseScenario {
    /// Purchase price
    pub house_cost: Money,
    /// Share of the price paid upfront
    pub down_payment_pct: Rate,
    /// Yearly mortgage rate
    pub mortgage_rate: Rate,
    /// Mortgage duration in years
    pub mortgage_years: u32,
    /// Years modelled after the loan is paid off
    pub years_after_payoff: u32,
    /// Yearly property tax
    pub yearly_tax: Money,
    /// Yearly insurance cost
    pub yearly_insurance: Money,
    /// Yearly repair budget
    pub yearly_repair: Money,
    /// Average monthly rent before fees, vacancy and tax
    pub monthly_rent: Money,
    /// Share of the property (or of the time) that is rented out
    pub percentage_rented: Rate,
    /// Yearly growth of the real estate market; rent follows it
    pub estate_rate: Rate,
    /// Yearly inflation applied to the running costs
    pub inflation_rate: Rate,
    /// Flat income tax rate on rental income
    pub income_tax: Rate,
    /// Property management fee as a share of rent
    pub management_fee: Rate,
    /// Yearly return of the alternative investment
    pub stock_market_rate: Rate,
    /// First month of ownership, used to date schedule rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl Default for HouseScenario {
    fn default() -> Self {
        Self {
            house_cost: dec!(240000),
            down_payment_pct: dec!(0.10),
            mortgage_rate: dec!(0.0275),
            mortgage_years: 15,
            years_after_payoff: 5,
            yearly_tax: dec!(4000),
            yearly_insurance: dec!(3000),
            yearly_repair: dec!(6000),
            monthly_rent: dec!(7500),
            percentage_rented: dec!(0.5),
            estate_rate: dec!(0.035),
            inflation_rate: dec!(0.021),
            income_tax: dec!(0.33),
            management_fee: dec!(0.22),
            stock_market_rate: dec!(0.08),
            start_date: None,
        }
    }
}

impl HouseScenario {
    pub fn loan_amount(&self) -> Money {
        self.house_cost * (Decimal::ONE - self.down_payment_pct)
    }

    pub fn down_payment(&self) -> Money {
        self.house_cost * self.down_payment_pct
    }

    pub fn n_months_repay(&self) -> u32 {
        self.mortgage_years * 12
    }

    pub fn n_total_months(&self) -> u32 {
        self.n_months_repay() + self.years_after_payoff * 12
    }

    pub fn mortgage_terms(&self) -> MortgageTerms {
        MortgageTerms::monthly(self.mortgage_rate, self.loan_amount(), self.mortgage_years)
    }

    /// Check the scenario and collect advisory warnings.
    pub fn validate(&self) -> HouseInvestResult<Vec<String>> {
        let mut warnings = Vec::new();

        if self.house_cost <= Decimal::ZERO {
            return Err(HouseInvestError::InvalidInput {
                field: "house_cost".into(),
                reason: "House price must be positive".into(),
            });
        }

        if self.mortgage_years < 1 || self.mortgage_years > MAX_YEARS {
            return Err(HouseInvestError::InvalidInput {
                field: "mortgage_years".into(),
                reason: format!("Mortgage duration must be between 1 and {MAX_YEARS} years"),
            });
        }

        if self.years_after_payoff > MAX_YEARS {
            return Err(HouseInvestError::InvalidInput {
                field: "years_after_payoff".into(),
                reason: format!("Cannot model more than {MAX_YEARS} years after pay off"),
            });
        }

        for (field, value) in [
            ("down_payment_pct", self.down_payment_pct),
            ("percentage_rented", self.percentage_rented),
            ("income_tax", self.income_tax),
            ("management_fee", self.management_fee),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(HouseInvestError::InvalidInput {
                    field: field.into(),
                    reason: "Must be a fraction between 0 and 1".into(),
                });
            }
        }

        for (field, value) in [
            ("yearly_tax", self.yearly_tax),
            ("yearly_insurance", self.yearly_insurance),
            ("yearly_repair", self.yearly_repair),
            ("monthly_rent", self.monthly_rent),
        ] {
            if value < Decimal::ZERO {
                return Err(HouseInvestError::InvalidInput {
                    field: field.into(),
                    reason: "Cannot be negative".into(),
                });
            }
        }

        for (field, value) in [
            ("mortgage_rate", self.mortgage_rate),
            ("estate_rate", self.estate_rate),
            ("inflation_rate", self.inflation_rate),
            ("stock_market_rate", self.stock_market_rate),
        ] {
            if value <= Decimal::NEGATIVE_ONE || value > Decimal::ONE {
                return Err(HouseInvestError::InvalidInput {
                    field: field.into(),
                    reason: "Yearly rate must be greater than -100% and at most 100%".into(),
                });
            }
        }

        if self.percentage_rented.is_zero() || self.monthly_rent.is_zero() {
            warnings.push("No part of the property is rented, so rental income is zero".into());
        }

        if self.mortgage_rate > self.stock_market_rate {
            warnings.push(format!(
                "Mortgage rate {:.2}% exceeds the alternative investment rate {:.2}%",
                self.mortgage_rate * dec!(100),
                self.stock_market_rate * dec!(100)
            ));
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_valid() {
        let scenario = HouseScenario::default();
        let warnings = scenario.validate().unwrap();
        assert!(warnings.is_empty(), "Unexpected warnings: {warnings:?}");
        assert_eq!(scenario.loan_amount(), dec!(216000));
        assert_eq!(scenario.down_payment(), dec!(24000));
        assert_eq!(scenario.n_months_repay(), 180);
        assert_eq!(scenario.n_total_months(), 240);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let scenario: HouseScenario =
            serde_json::from_str(r#"{"house_cost": "300000", "mortgage_years": 30}"#).unwrap();
        assert_eq!(scenario.house_cost, dec!(300000));
        assert_eq!(scenario.mortgage_years, 30);
        assert_eq!(scenario.monthly_rent, dec!(7500));
        assert_eq!(scenario.start_date, None);
    }

    #[test]
    fn test_rejects_out_of_range_fraction() {
        let scenario = HouseScenario {
            income_tax: dec!(1.5),
            ..HouseScenario::default()
        };
        match scenario.validate().unwrap_err() {
            HouseInvestError::InvalidInput { field, .. } => assert_eq!(field, "income_tax"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_mortgage_years() {
        let scenario = HouseScenario {
            mortgage_years: 0,
            ..HouseScenario::default()
        };
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_warns_when_mortgage_costlier_than_stocks() {
        let scenario = HouseScenario {
            mortgage_rate: dec!(0.09),
            ..HouseScenario::default()
        };
        let warnings = scenario.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exceeds"));
    }
}
