//! Allocation run computation across portfolios and their positions.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::portfolio::{BuilderWeights, Portfolio};

use super::rebalancing_model::{
    CategoryAllocation, PortfolioAllocation, PositionAllocation, RebalanceInput, RebalanceMode,
    RebalancePlan, RebalancePlanSummary,
};
use super::target_resolver::resolve_position_targets;
use super::weight_normalizer::normalized_weights;

/// Computes target values and buy/sell actions for a set of portfolios
/// under a chosen rebalance mode.
///
/// The allocator is stateless and pure over its inputs: calling it twice
/// with the same snapshot yields the same plan. Upstream eligibility
/// filtering (zero-value / zero-weight portfolios) is the caller's step;
/// whatever set arrives here is computed as-is.
#[derive(Default, Debug, Clone)]
pub struct RebalancingAllocator {}

impl RebalancingAllocator {
    pub fn new() -> Self {
        RebalancingAllocator {}
    }

    /// Runs the full allocation: normalization, per-portfolio targets and
    /// actions, then position-level distribution inside each portfolio.
    pub fn compute(&self, input: &RebalanceInput) -> Result<RebalancePlan> {
        input.validate()?;
        debug!(
            "Computing {} rebalance over {} portfolios",
            input.mode,
            input.portfolios.len()
        );

        let hundred = Decimal::from(100);
        let portfolios: Vec<&Portfolio> = input.portfolios.iter().collect();
        let weights = normalized_weights(&portfolios);

        let total_current_value: Decimal = portfolios.iter().map(|p| p.current_value).sum();

        // existing-only ignores new capital entirely. new-only measures
        // deficits against targets over existing capital and fills them
        // with the injection, so only new-with-sells grows the target base.
        let investment = match input.mode {
            RebalanceMode::ExistingOnly => Decimal::ZERO,
            _ => input.investment_amount,
        };
        let target_base = match input.mode {
            RebalanceMode::NewWithSells => total_current_value + investment,
            _ => total_current_value,
        };

        let target_values: Vec<Decimal> = weights
            .iter()
            .map(|w| *w / hundred * target_base)
            .collect();
        let discrepancies: Vec<Decimal> = portfolios
            .iter()
            .zip(&target_values)
            .map(|(p, target)| *target - p.current_value)
            .collect();

        let actions = match input.mode {
            RebalanceMode::ExistingOnly | RebalanceMode::NewWithSells => discrepancies.clone(),
            RebalanceMode::NewOnly => Self::distribute_new_capital(&discrepancies, investment),
        };

        let values_after: Vec<Decimal> = portfolios
            .iter()
            .zip(&actions)
            .map(|(p, action)| p.current_value + *action)
            .collect();
        let total_after: Decimal = values_after.iter().copied().sum();

        let allocations: Vec<PortfolioAllocation> = portfolios
            .iter()
            .enumerate()
            .map(|(i, portfolio)| {
                let allocation_after = if total_after > Decimal::ZERO {
                    (values_after[i] / total_after * hundred).round_dp(DISPLAY_DECIMAL_PRECISION)
                } else {
                    Decimal::ZERO
                };
                PortfolioAllocation {
                    portfolio_id: portfolio.id,
                    name: portfolio.name.clone(),
                    current_value: portfolio.current_value,
                    normalized_weight: weights[i].round_dp(DISPLAY_DECIMAL_PRECISION),
                    target_value: target_values[i],
                    action: actions[i],
                    value_after_action: values_after[i],
                    allocation_after_action: allocation_after,
                    categories: Self::distribute_positions(
                        portfolio,
                        input.builder_weights.as_ref(),
                        input.mode,
                        actions[i],
                        values_after[i],
                    ),
                }
            })
            .collect();

        let total_buys: Decimal = actions
            .iter()
            .filter(|a| **a > Decimal::ZERO)
            .copied()
            .sum();
        let total_sells: Decimal = actions
            .iter()
            .filter(|a| **a < Decimal::ZERO)
            .map(|a| -*a)
            .sum();
        let allocated: Decimal = actions.iter().copied().sum();
        let unallocated = match input.mode {
            RebalanceMode::NewOnly => (investment - allocated).max(Decimal::ZERO),
            _ => Decimal::ZERO,
        };

        Ok(RebalancePlan {
            mode: input.mode,
            portfolios: allocations,
            summary: RebalancePlanSummary {
                total_current_value,
                new_total_value: total_current_value + investment,
                total_buys,
                total_sells,
                unallocated,
            },
        })
    }

    /// new-only policy: fund every deficit when capital suffices, else
    /// split the scarce capital pro-rata by share of the total deficit.
    /// No sells ever occur here.
    fn distribute_new_capital(discrepancies: &[Decimal], investment: Decimal) -> Vec<Decimal> {
        let total_needed: Decimal = discrepancies
            .iter()
            .filter(|d| **d > Decimal::ZERO)
            .copied()
            .sum();
        if total_needed <= Decimal::ZERO {
            return vec![Decimal::ZERO; discrepancies.len()];
        }
        if investment >= total_needed {
            return discrepancies
                .iter()
                .map(|d| (*d).max(Decimal::ZERO))
                .collect();
        }
        discrepancies
            .iter()
            .map(|d| {
                if *d > Decimal::ZERO {
                    *d / total_needed * investment
                } else {
                    Decimal::ZERO
                }
            })
            .collect()
    }

    /// Re-applies the discrepancy-to-action logic one level down, across
    /// the positions of a portfolio, using the portfolio's own action
    /// amount as the capital to distribute.
    fn distribute_positions(
        portfolio: &Portfolio,
        builder: Option<&BuilderWeights>,
        mode: RebalanceMode,
        portfolio_action: Decimal,
        portfolio_value_after: Decimal,
    ) -> Vec<CategoryAllocation> {
        let hundred = Decimal::from(100);
        let resolved = resolve_position_targets(portfolio, builder);

        let discrepancy_of = |target_allocation: Decimal, current_value: Decimal| -> Decimal {
            target_allocation / hundred * portfolio_value_after - current_value
        };

        let total_positive_discrepancy: Decimal = resolved
            .iter()
            .flat_map(|c| c.positions.iter())
            .map(|p| discrepancy_of(p.target_allocation, p.current_value).max(Decimal::ZERO))
            .sum();

        resolved
            .into_iter()
            .map(|category| {
                let positions: Vec<PositionAllocation> = category
                    .positions
                    .into_iter()
                    .map(|position| {
                        let target_value =
                            position.target_allocation / hundred * portfolio_value_after;
                        let discrepancy = target_value - position.current_value;
                        let action = match mode {
                            RebalanceMode::ExistingOnly => discrepancy,
                            _ => {
                                if discrepancy > Decimal::ZERO
                                    && total_positive_discrepancy > Decimal::ZERO
                                {
                                    discrepancy / total_positive_discrepancy * portfolio_action
                                } else {
                                    Decimal::ZERO
                                }
                            }
                        };
                        PositionAllocation {
                            name: position.name,
                            current_value: position.current_value,
                            target_allocation: position.target_allocation,
                            calculated_target_value: target_value,
                            action,
                            value_after: position.current_value + action,
                            is_placeholder: position.is_placeholder,
                        }
                    })
                    .collect();

                CategoryAllocation {
                    name: category.name,
                    current_value: positions.iter().map(|p| p.current_value).sum(),
                    target_allocation: positions.iter().map(|p| p.target_allocation).sum(),
                    calculated_target_value: positions
                        .iter()
                        .map(|p| p.calculated_target_value)
                        .sum(),
                    action: positions.iter().map(|p| p.action).sum(),
                    value_after: positions.iter().map(|p| p.value_after).sum(),
                    positions,
                }
            })
            .collect()
    }
}
