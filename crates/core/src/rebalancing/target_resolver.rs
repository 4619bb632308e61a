//! Per-position target resolution and missing-position synthesis.
//!
//! Every position of a portfolio ends up with a resolved target share:
//! the builder weight matched by normalized name wins, then the position's
//! own user-defined allocation, then a default derived from the builder's
//! placeholder weight or from equal distribution of whatever allocation
//! remains. Portfolios below their minimum position count grow a synthetic
//! "Missing Positions" category of placeholder slots.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::MISSING_POSITIONS_CATEGORY;
use crate::portfolio::{BuilderWeights, Portfolio, Position};

/// A position with its resolved target share, before value computation.
#[derive(Debug, Clone)]
pub struct ResolvedPosition {
    pub name: String,
    pub current_value: Decimal,
    /// Resolved target share of the portfolio (percent, 0-100).
    pub target_allocation: Decimal,
    pub is_placeholder: bool,
}

/// A category whose positions carry resolved target shares.
#[derive(Debug, Clone)]
pub struct ResolvedCategory {
    pub name: String,
    pub positions: Vec<ResolvedPosition>,
}

/// Resolves target shares for every position of `portfolio`, appending the
/// synthetic "Missing Positions" category when the portfolio is short of
/// its minimum position count.
///
/// Placeholder slot names are deterministic so that identical inputs
/// produce identical plans.
pub fn resolve_position_targets(
    portfolio: &Portfolio,
    builder: Option<&BuilderWeights>,
) -> Vec<ResolvedCategory> {
    let real_count = portfolio.position_count();
    let missing_count = portfolio.min_positions.saturating_sub(real_count);

    let defined_weight = |position: &Position| -> Option<Decimal> {
        builder
            .and_then(|b| b.weight_for(&position.name))
            .or_else(|| position.target_allocation.filter(|t| *t > Decimal::ZERO))
    };

    // First pass: how much allocation is spoken for, and how many slots
    // (real positions without a weight + missing slots) share the rest.
    let mut defined_sum = Decimal::ZERO;
    let mut lacking_count = missing_count;
    for category in &portfolio.categories {
        for position in &category.positions {
            match defined_weight(position) {
                Some(weight) => defined_sum += weight,
                None => lacking_count += 1,
            }
        }
    }

    let default_allocation = derive_default_allocation(builder, defined_sum, lacking_count);

    let mut categories: Vec<ResolvedCategory> = portfolio
        .categories
        .iter()
        .map(|category| ResolvedCategory {
            name: category.name.clone(),
            positions: category
                .positions
                .iter()
                .map(|position| ResolvedPosition {
                    name: position.name.clone(),
                    current_value: position.current_value,
                    target_allocation: defined_weight(position).unwrap_or(default_allocation),
                    is_placeholder: false,
                })
                .collect(),
        })
        .collect();

    if missing_count > 0 {
        let real_sum: Decimal = categories
            .iter()
            .flat_map(|c| c.positions.iter())
            .map(|p| p.target_allocation)
            .sum();

        // Real holdings that already fill the portfolio take precedence
        // over unfilled slots.
        let slot_target = if real_sum.round_dp(0) < Decimal::from(100) {
            default_allocation
        } else {
            debug!(
                "Portfolio '{}' already allocated {}%, zeroing {} placeholder slot(s)",
                portfolio.name, real_sum, missing_count
            );
            Decimal::ZERO
        };

        categories.push(ResolvedCategory {
            name: MISSING_POSITIONS_CATEGORY.to_string(),
            positions: (0..missing_count)
                .map(|i| ResolvedPosition {
                    name: format!("Open slot {}", i + 1),
                    current_value: Decimal::ZERO,
                    target_allocation: slot_target,
                    is_placeholder: true,
                })
                .collect(),
        });
    }

    categories
}

/// Default share for positions without a defined weight: the builder's
/// placeholder weight when present, otherwise an equal split of the
/// remaining allocation over the slots that lack one.
fn derive_default_allocation(
    builder: Option<&BuilderWeights>,
    defined_sum: Decimal,
    lacking_count: usize,
) -> Decimal {
    if let Some(weight) = builder.and_then(|b| b.placeholder_weight) {
        return weight.max(Decimal::ZERO);
    }
    if lacking_count == 0 {
        return Decimal::ZERO;
    }
    let remaining = Decimal::from(100) - defined_sum;
    if remaining <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    remaining / Decimal::from(lacking_count as u64)
}
