use house_invest_core::mortgage::amortization::{
    build_amortization_schedule, equity_and_interest, AmortizationInput,
};
use house_invest_core::mortgage::payment::{
    calculate_mortgage_payment, mortgage_payment, MortgageTerms,
};
use house_invest_core::HouseInvestError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Payment
// ===========================================================================

#[test]
fn test_reference_payment() {
    // 100k, 2.5%, 15 years: 666.7892...
    let payment = mortgage_payment(&MortgageTerms::monthly(dec!(0.025), dec!(100000), 15)).unwrap();
    assert!((payment - dec!(666.7892090089922)).abs() < dec!(0.000001));
}

#[test]
fn test_thirty_year_payment() {
    // 300k, 6%, 30 years: 1798.65
    let payment = mortgage_payment(&MortgageTerms::monthly(dec!(0.06), dec!(300000), 30)).unwrap();
    assert!((payment - dec!(1798.65)).abs() < dec!(0.01), "Got {payment}");
}

#[test]
fn test_invalid_terms() {
    let zero_years = MortgageTerms::monthly(dec!(0.04), dec!(1000), 0);
    assert!(matches!(
        mortgage_payment(&zero_years),
        Err(HouseInvestError::InvalidInput { .. })
    ));

    let no_payments = MortgageTerms {
        payments_per_year: 0,
        ..MortgageTerms::monthly(dec!(0.04), dec!(1000), 10)
    };
    assert!(matches!(
        mortgage_payment(&no_payments),
        Err(HouseInvestError::InvalidInput { .. })
    ));

    let degenerate_rate = MortgageTerms {
        annual_rate: dec!(-12),
        ..MortgageTerms::monthly(dec!(0.04), dec!(1000), 10)
    };
    assert!(matches!(
        mortgage_payment(&degenerate_rate),
        Err(HouseInvestError::InvalidInput { .. })
    ));
}

#[test]
fn test_payment_envelope_from_json() {
    let terms: MortgageTerms = serde_json::from_str(
        r#"{"annual_rate": "0.025", "loan_amount": "100000", "years_to_maturity": 15}"#,
    )
    .unwrap();
    assert_eq!(terms.payments_per_year, 12);

    let result = calculate_mortgage_payment(&terms).unwrap();
    assert_eq!(result.result.n_periods, 180);
    assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    assert_eq!(result.assumptions["years_to_maturity"], 15);
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_balance_converges_to_zero() {
    for (rate, years) in [(dec!(0.025), 15u32), (dec!(0.07), 30), (dec!(0.001), 5)] {
        let terms = MortgageTerms::monthly(rate, dec!(240000), years);
        let schedule = equity_and_interest(&terms, Decimal::ZERO, Some(Decimal::ZERO)).unwrap();
        let balance = *schedule.remaining_loan.last().unwrap();
        assert_eq!(schedule.equity.len(), (years * 12 + 1) as usize);
        assert!(balance.abs() < dec!(0.000001), "rate {rate}: balance {balance}");
    }
}

#[test]
fn test_interest_is_cumulative() {
    let terms = MortgageTerms::monthly(dec!(0.05), dec!(200000), 20);
    let schedule = equity_and_interest(&terms, Decimal::ZERO, None).unwrap();
    for pair in schedule.interest_paid.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    for pair in schedule.equity.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn test_schedule_is_idempotent() {
    let input = AmortizationInput {
        annual_rate: dec!(0.0275),
        loan_amount: dec!(216000),
        years_to_maturity: 15,
        payments_per_year: 12,
        initial_equity: dec!(24000),
        estate_growth_rate: Some(dec!(0.035)),
    };
    let first = build_amortization_schedule(&input).unwrap().result;
    let second = build_amortization_schedule(&input).unwrap().result;
    assert_eq!(first.final_equity, second.final_equity);
    assert_eq!(first.total_interest, second.total_interest);
    assert_eq!(first.schedule.len(), second.schedule.len());
}

// ===========================================================================
// Limits
// ===========================================================================

fn assert_invalid_input<T: std::fmt::Debug>(result: Result<T, HouseInvestError>, field: &str) {
    match result {
        Err(HouseInvestError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
        other => panic!("Expected InvalidInput on {field}, got {other:?}"),
    }
}

#[test]
fn test_longest_term_at_highest_rate_is_invalid_input() {
    // (1 + 1/12)^1200 is far beyond the Decimal range
    let terms = MortgageTerms::monthly(Decimal::ONE, dec!(100000), 100);
    assert!(terms.validate().is_ok());
    assert_invalid_input(mortgage_payment(&terms), "rate");
    assert_invalid_input(calculate_mortgage_payment(&terms), "rate");
}

#[test]
fn test_daily_payments_at_highest_rate_is_invalid_input() {
    let terms = MortgageTerms {
        annual_rate: Decimal::ONE,
        loan_amount: dec!(100000),
        years_to_maturity: 100,
        payments_per_year: 365,
    };
    assert!(terms.validate().is_ok());
    assert_invalid_input(mortgage_payment(&terms), "rate");
}

#[test]
fn test_daily_payments_at_cap_compute() {
    let terms = MortgageTerms {
        annual_rate: dec!(0.05),
        loan_amount: dec!(300000),
        years_to_maturity: 30,
        payments_per_year: 365,
    };
    let payment = mortgage_payment(&terms).unwrap();
    let r = dec!(0.05) / dec!(365);
    let growth = house_invest_core::time_value::compound(r, 10950).unwrap();
    let annuity = dec!(300000) * r * growth / (growth - Decimal::ONE);
    assert!((payment - annuity).abs() < dec!(0.000001), "{payment} vs {annuity}");
}

#[test]
fn test_largest_loan_is_invalid_input() {
    let terms = MortgageTerms::monthly(dec!(0.05), Decimal::MAX, 30);
    assert_invalid_input(mortgage_payment(&terms), "loan_amount");
}

#[test]
fn test_schedule_at_limits_is_invalid_input() {
    let input = AmortizationInput {
        annual_rate: Decimal::ONE,
        loan_amount: dec!(100000),
        years_to_maturity: 100,
        payments_per_year: 12,
        initial_equity: Decimal::ZERO,
        estate_growth_rate: None,
    };
    assert_invalid_input(build_amortization_schedule(&input), "rate");
}

#[test]
fn test_equity_past_decimal_range_is_invalid_input() {
    let terms = MortgageTerms::monthly(dec!(0.03), dec!(1000000), 10);
    assert_invalid_input(
        equity_and_interest(&terms, Decimal::MAX, None),
        "initial_equity",
    );
    // Appreciation at 100% a year over 100 years overflows the growth path
    let long_terms = MortgageTerms::monthly(dec!(0.03), dec!(1000), 100);
    assert_invalid_input(
        equity_and_interest(&long_terms, Decimal::ZERO, Some(Decimal::ONE)),
        "rate",
    );
}
