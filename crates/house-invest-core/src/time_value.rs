use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HouseInvestError;
use crate::types::{Money, Rate, Series};
use crate::HouseInvestResult;

/// When a period's contribution enters the running total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestTiming {
    /// Contribution is added after the period's growth, so it does not earn it.
    #[default]
    EndOfPeriod,
    /// The first contribution earns the first period's growth before the loop starts.
    BeginningOfPeriod,
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> HouseInvestResult<Decimal> {
    let factor = growth_factor(rate)?;
    let mut result = Decimal::ONE;
    for period in 0..n as usize {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| overflow_error("rate", period))?;
    }
    Ok(result)
}

/// Growth factors (1 + r)^(k+1) for k in 0..n.
pub fn compound_path(rate: Rate, n: usize) -> HouseInvestResult<Series> {
    let factor = growth_factor(rate)?;
    let mut current = Decimal::ONE;
    (0..n)
        .map(|period| {
            current
                .checked_mul(factor)
                .map(|next| {
                    current = next;
                    next
                })
                .ok_or_else(|| overflow_error("rate", period))
        })
        .collect()
}

/// `amount` scaled by every factor of a growth path.
pub fn scale_path(amount: Money, factors: &[Decimal], field: &str) -> HouseInvestResult<Series> {
    factors
        .iter()
        .enumerate()
        .map(|(period, factor)| {
            amount
                .checked_mul(*factor)
                .ok_or_else(|| overflow_error(field, period))
        })
        .collect()
}

/// Element-wise `op(a[k], b[k])` over two aligned series, stopping at the
/// shorter one.
pub(crate) fn zip_with(
    a: &[Money],
    b: &[Money],
    field: &str,
    op: fn(Decimal, Decimal) -> Option<Decimal>,
) -> HouseInvestResult<Series> {
    a.iter()
        .zip(b)
        .enumerate()
        .map(|(period, (x, y))| op(*x, *y).ok_or_else(|| overflow_error(field, period)))
        .collect()
}

/// Running value of a series of contributions, the total growing by the
/// matching period rate from one contribution to the next.
///
/// In `EndOfPeriod` mode the first rate is never applied, since nothing is
/// invested yet when the first period grows. In `BeginningOfPeriod` mode the
/// first contribution is grown by the first rate and the loop continues from
/// the second element. Inputs are never modified.
pub fn series_values(
    invest: &[Money],
    rate: &[Rate],
    timing: InvestTiming,
) -> HouseInvestResult<Series> {
    if invest.len() != rate.len() {
        return Err(HouseInvestError::InvalidInput {
            field: "rate".into(),
            reason: format!(
                "Expected one rate per invested amount ({}), got {}",
                invest.len(),
                rate.len()
            ),
        });
    }

    let mut values = Vec::with_capacity(invest.len());
    let (mut total, start) = match (timing, invest.first(), rate.first()) {
        (InvestTiming::BeginningOfPeriod, Some(first), Some(first_rate)) => {
            let grown = first
                .checked_mul(growth_factor(*first_rate)?)
                .ok_or_else(|| overflow_error("invest", 0))?;
            values.push(grown);
            (grown, 1)
        }
        _ => (Decimal::ZERO, 0),
    };

    for (offset, (amount, r)) in invest[start..].iter().zip(&rate[start..]).enumerate() {
        total = total
            .checked_mul(growth_factor(*r)?)
            .and_then(|grown| grown.checked_add(*amount))
            .ok_or_else(|| overflow_error("invest", start + offset))?;
        values.push(total);
    }

    Ok(values)
}

/// Final value of [`series_values`]; zero for an empty series.
pub fn series_total(
    invest: &[Money],
    rate: &[Rate],
    timing: InvestTiming,
) -> HouseInvestResult<Money> {
    let values = series_values(invest, rate, timing)?;
    Ok(values.last().copied().unwrap_or(Decimal::ZERO))
}

/// Closed form of [`series_total`] for a constant contribution at a constant
/// rate, invested at the end of each of `n_periods` periods.
pub fn regular_investment_total(
    contribution: Money,
    rate: Rate,
    n_periods: u32,
) -> HouseInvestResult<Money> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(HouseInvestError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    if rate.is_zero() {
        return contribution
            .checked_mul(Decimal::from(n_periods))
            .ok_or_else(|| overflow_error("contribution", n_periods as usize));
    }

    let factor = growth_factor(rate)?;
    let factor_n = compound(rate, n_periods)?;
    (factor - factor_n)
        .checked_mul(contribution)
        .and_then(|grown| grown.checked_div(Decimal::ONE - factor))
        .and_then(|grown| grown.checked_add(contribution))
        .ok_or_else(|| overflow_error("contribution", n_periods as usize))
}

/// Lazily inflates a sequence of monthly costs: the i-th cost is scaled by
/// (1 + yearly_rate / 12)^i. Yields an error once the inflated cost no longer
/// fits a Decimal. Single pass; collect it to iterate twice.
#[derive(Debug, Clone)]
pub struct InflationAdjusted<I> {
    costs: I,
    monthly_factor: Decimal,
    current: Decimal,
    period: usize,
}

impl<I: Iterator<Item = Money>> Iterator for InflationAdjusted<I> {
    type Item = HouseInvestResult<Money>;

    fn next(&mut self) -> Option<Self::Item> {
        let cost = self.costs.next()?;
        let period = self.period;
        self.period += 1;
        if period > 0 {
            match self.current.checked_mul(self.monthly_factor) {
                Some(next) => self.current = next,
                None => return Some(Err(overflow_error("inflation_rate", period))),
            }
        }
        Some(
            cost.checked_mul(self.current)
                .ok_or_else(|| overflow_error("inflation_rate", period)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.costs.size_hint()
    }
}

impl<I: ExactSizeIterator<Item = Money>> ExactSizeIterator for InflationAdjusted<I> {}

pub fn inflation_adjust<I>(costs: I, yearly_rate: Rate) -> InflationAdjusted<I::IntoIter>
where
    I: IntoIterator<Item = Money>,
{
    InflationAdjusted {
        costs: costs.into_iter(),
        monthly_factor: Decimal::ONE + yearly_rate / Decimal::from(12),
        current: Decimal::ONE,
        period: 0,
    }
}

fn growth_factor(rate: Rate) -> HouseInvestResult<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| overflow_error("rate", 0))
}

pub(crate) fn overflow_error(field: &str, period: usize) -> HouseInvestError {
    HouseInvestError::InvalidInput {
        field: field.into(),
        reason: format!("Value no longer fits a decimal at period {period}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_series_total_zero_rate() {
        let total = series_total(&[dec!(1), dec!(1)], &[dec!(0), dec!(0)], InvestTiming::EndOfPeriod)
            .unwrap();
        assert_eq!(total, dec!(2));
    }

    #[test]
    fn test_series_values_zero_rate() {
        let values =
            series_values(&[dec!(1), dec!(1)], &[dec!(0), dec!(0)], InvestTiming::EndOfPeriod)
                .unwrap();
        assert_eq!(values, vec![dec!(1), dec!(2)]);
    }

    #[test]
    fn test_first_rate_unused_at_end_of_period() {
        let values =
            series_values(&[dec!(1), dec!(1)], &[dec!(0.05), dec!(0)], InvestTiming::EndOfPeriod)
                .unwrap();
        assert_eq!(values, vec![dec!(1.0), dec!(2.0)]);
    }

    #[test]
    fn test_beginning_of_period() {
        let values = series_values(
            &[dec!(1), dec!(1)],
            &[dec!(0.05), dec!(0)],
            InvestTiming::BeginningOfPeriod,
        )
        .unwrap();
        assert_eq!(values, vec![dec!(1.05), dec!(2.05)]);

        let values = series_values(
            &[dec!(1), dec!(1)],
            &[dec!(0.05), dec!(0.08)],
            InvestTiming::BeginningOfPeriod,
        )
        .unwrap();
        assert_eq!(values, vec![dec!(1.05), dec!(2.134)]);
    }

    #[test]
    fn test_beginning_of_period_leaves_inputs_untouched() {
        let invest = vec![dec!(100), dec!(100), dec!(100)];
        let rate = vec![dec!(0.01); 3];
        let first = series_values(&invest, &rate, InvestTiming::BeginningOfPeriod).unwrap();
        let second = series_values(&invest, &rate, InvestTiming::BeginningOfPeriod).unwrap();
        assert_eq!(invest.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_series() {
        assert!(series_values(&[], &[], InvestTiming::EndOfPeriod)
            .unwrap()
            .is_empty());
        assert_eq!(
            series_total(&[], &[], InvestTiming::BeginningOfPeriod).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = series_values(&[dec!(1), dec!(1)], &[dec!(0)], InvestTiming::EndOfPeriod)
            .unwrap_err();
        match err {
            HouseInvestError::InvalidInput { field, .. } => assert_eq!(field, "rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_ten_yearly_investments() {
        // 100 a year for 10 years at 8% ≈ 1448.656
        let total = series_total(&[dec!(100); 10], &[dec!(0.08); 10], InvestTiming::EndOfPeriod)
            .unwrap();
        assert!((total - dec!(1448.656246590984)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_regular_investment_total() {
        assert_eq!(regular_investment_total(dec!(10), dec!(0), 5).unwrap(), dec!(50));
        assert_eq!(regular_investment_total(dec!(10), dec!(0.01), 1).unwrap(), dec!(10));
        assert_eq!(regular_investment_total(dec!(10), dec!(0.01), 2).unwrap(), dec!(20.1));
        let five = regular_investment_total(dec!(10), dec!(0.01), 5).unwrap();
        assert!((five - dec!(51.0100501)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_regular_investment_rejects_total_loss_rate() {
        assert!(regular_investment_total(dec!(10), dec!(-1), 3).is_err());
    }

    #[test]
    fn test_compound_path() {
        let path = compound_path(dec!(0.1), 3).unwrap();
        assert_eq!(path, vec![dec!(1.1), dec!(1.21), dec!(1.331)]);
        assert_eq!(path[2], compound(dec!(0.1), 3).unwrap());
    }

    #[test]
    fn test_inflation_adjust_is_lazy_and_exact() {
        let adjusted = inflation_adjust(vec![dec!(100); 3], dec!(0.12));
        assert_eq!(adjusted.len(), 3);
        let costs: Series = adjusted.collect::<HouseInvestResult<_>>().unwrap();
        assert_eq!(costs, vec![dec!(100), dec!(101), dec!(102.01)]);
    }

    #[test]
    fn test_inflation_adjust_zero_rate() {
        let costs: Series = inflation_adjust([dec!(5), dec!(7)], Decimal::ZERO)
            .collect::<HouseInvestResult<_>>()
            .unwrap();
        assert_eq!(costs, vec![dec!(5), dec!(7)]);
    }

    #[test]
    fn test_compound_overflow_is_an_error() {
        // 2^100 no longer fits a Decimal
        match compound(Decimal::ONE, 100).unwrap_err() {
            HouseInvestError::InvalidInput { field, .. } => assert_eq!(field, "rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(compound_path(Decimal::ONE, 100).is_err());
        assert_eq!(compound(Decimal::ONE, 90).unwrap(), Decimal::from_i128_with_scale(1 << 90, 0));
    }

    #[test]
    fn test_scale_path_overflow_is_an_error() {
        let path = compound_path(dec!(0.5), 4).unwrap();
        assert_eq!(
            scale_path(dec!(16), &path, "house_cost").unwrap(),
            vec![dec!(24), dec!(36), dec!(54), dec!(81)]
        );
        assert!(scale_path(Decimal::MAX, &path, "house_cost").is_err());
    }

    #[test]
    fn test_series_values_overflow_is_an_error() {
        let result = series_values(
            &[Decimal::MAX, Decimal::MAX],
            &[Decimal::ZERO, Decimal::ZERO],
            InvestTiming::EndOfPeriod,
        );
        assert!(matches!(result, Err(HouseInvestError::InvalidInput { .. })));
    }

    #[test]
    fn test_inflation_overflow_is_an_error() {
        // (1 + 1/12)^2999 is far past the Decimal range
        let costs: HouseInvestResult<Series> =
            inflation_adjust(vec![Decimal::ONE; 3000], Decimal::ONE).collect();
        match costs.unwrap_err() {
            HouseInvestError::InvalidInput { field, .. } => assert_eq!(field, "inflation_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
