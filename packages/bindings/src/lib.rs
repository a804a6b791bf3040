use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn mortgage_payment(input_json: String) -> NapiResult<String> {
    let input: house_invest_core::mortgage::payment::MortgageTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = house_invest_core::mortgage::payment::calculate_mortgage_payment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: house_invest_core::mortgage::amortization::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = house_invest_core::mortgage::amortization::build_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Housing
// ---------------------------------------------------------------------------

#[napi]
pub fn house_vs_stock(input_json: String) -> NapiResult<String> {
    let scenario: house_invest_core::housing::scenario::HouseScenario =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = house_invest_core::housing::comparison::analyze_house_vs_stock(&scenario)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn house_investment_series(input_json: String) -> NapiResult<String> {
    let scenario: house_invest_core::housing::scenario::HouseScenario =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = house_invest_core::housing::house_investment::house_investment(&scenario)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
