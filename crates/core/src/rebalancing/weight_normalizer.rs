//! Normalization of raw portfolio target weights.

use rust_decimal::Decimal;

use crate::portfolio::Portfolio;

/// Filters the portfolios that participate in an allocation run.
///
/// This is the upstream exclusion step: zero-value or zero-weight
/// portfolios never reach the allocator. The allocator itself computes
/// over whatever set it is handed.
pub fn eligible_portfolios(portfolios: &[Portfolio]) -> Vec<&Portfolio> {
    portfolios.iter().filter(|p| p.is_eligible()).collect()
}

/// Normalizes raw target weights into percentages summing to 100 over the
/// given set. If the weights sum to zero, every normalized weight is zero.
pub fn normalized_weights(portfolios: &[&Portfolio]) -> Vec<Decimal> {
    let total: Decimal = portfolios.iter().map(|p| p.target_weight).sum();
    if total <= Decimal::ZERO {
        return vec![Decimal::ZERO; portfolios.len()];
    }
    portfolios
        .iter()
        .map(|p| p.target_weight / total * Decimal::from(100))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn portfolio(id: i64, value: Decimal, weight: Decimal) -> Portfolio {
        Portfolio {
            id,
            name: format!("Portfolio {}", id),
            current_value: value,
            target_weight: weight,
            min_positions: 0,
            categories: Vec::new(),
        }
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let portfolios = vec![
            portfolio(1, dec!(1000), dec!(3)),
            portfolio(2, dec!(500), dec!(1)),
        ];
        let refs: Vec<&Portfolio> = portfolios.iter().collect();
        let weights = normalized_weights(&refs);
        assert_eq!(weights, vec![dec!(75), dec!(25)]);
    }

    #[test]
    fn zero_weight_sum_yields_all_zeros() {
        let portfolios = vec![
            portfolio(1, dec!(1000), dec!(0)),
            portfolio(2, dec!(500), dec!(0)),
        ];
        let refs: Vec<&Portfolio> = portfolios.iter().collect();
        assert_eq!(normalized_weights(&refs), vec![dec!(0), dec!(0)]);
    }

    #[test]
    fn eligibility_drops_zero_value_and_zero_weight() {
        let portfolios = vec![
            portfolio(1, dec!(1000), dec!(50)),
            portfolio(2, dec!(0), dec!(50)),
            portfolio(3, dec!(300), dec!(0)),
        ];
        let eligible = eligible_portfolios(&portfolios);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 1);
    }
}
