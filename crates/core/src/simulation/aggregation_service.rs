//! Aggregation of baseline holdings with simulated additions.

use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::constants::{DELTA_THRESHOLD, DISPLAY_DECIMAL_PRECISION};
use crate::utils::labels::normalize_or;

use super::simulation_model::{
    AggregationInput, AllocationBreakdown, BaselineAllocation, Dimension, LabelAllocation,
    PositionDetail, SimulatedItem, SimulationBreakdowns, ValueMode,
};
use super::target_solver::{solve_required_addition, TargetSolveInput};

fn delta_threshold() -> Decimal {
    Decimal::from_str_radix(DELTA_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 1))
}

/// Merges a baseline allocation with the live list of simulated items into
/// per-label breakdowns.
///
/// Pure over its inputs: the caller re-invokes it with a fresh snapshot
/// whenever the baseline, the items, or the scope change.
#[derive(Default, Debug, Clone)]
pub struct AllocationAggregator {}

impl AllocationAggregator {
    pub fn new() -> Self {
        AllocationAggregator {}
    }

    /// Computes the breakdowns of all three dimensions in one pass.
    pub fn aggregate_all(&self, input: &AggregationInput) -> SimulationBreakdowns {
        let countries = self.aggregate(input, Dimension::Country);
        let combined_total = countries.combined_total;
        SimulationBreakdowns {
            countries,
            sectors: self.aggregate(input, Dimension::Sector),
            theses: self.aggregate(input, Dimension::Thesis),
            combined_total,
        }
    }

    /// Computes the per-label breakdown of one dimension, restricted to
    /// items matching the active scope.
    pub fn aggregate(&self, input: &AggregationInput, dimension: Dimension) -> AllocationBreakdown {
        let hundred = Decimal::from(100);
        let baseline = &input.baseline;
        let baseline_total = baseline.baseline_total();

        let scoped: Vec<&SimulatedItem> = input
            .items
            .iter()
            .filter(|item| item.in_scope(input.scope))
            .collect();
        let scoped_total: Decimal = scoped.iter().map(|item| item.value).sum();
        let combined_total = baseline_total + scoped_total;

        // Global share denominator: every portfolio plus every simulated
        // item, independent of the active scope filter.
        let all_items_total: Decimal = input.items.iter().map(|item| item.value).sum();
        let global_total =
            input.global_portfolio_total.unwrap_or(baseline_total) + all_items_total;

        debug!(
            "Aggregating {:?} over {} baseline labels and {} in-scope items",
            dimension,
            baseline.labels(dimension).len(),
            scoped.len()
        );

        // Baseline values per normalized label; case/whitespace variants
        // collapse into one bucket here.
        let mut baseline_values: HashMap<String, Decimal> = HashMap::new();
        for lv in baseline.labels(dimension) {
            *baseline_values
                .entry(normalize_or(&lv.name, dimension.fallback_label()))
                .or_insert(Decimal::ZERO) += lv.value;
        }

        let mut label_values = baseline_values.clone();
        for item in &scoped {
            *label_values
                .entry(item.label_for(dimension))
                .or_insert(Decimal::ZERO) += item.value;
        }

        let threshold = delta_threshold();
        let mut entries: Vec<LabelAllocation> = label_values
            .into_iter()
            .filter(|(_, value)| *value > Decimal::ZERO)
            .map(|(label, value)| {
                let percentage = if combined_total > Decimal::ZERO {
                    value / combined_total * hundred
                } else {
                    Decimal::ZERO
                };
                let baseline_value = baseline_values.get(&label).copied().unwrap_or(Decimal::ZERO);
                let baseline_pct = if baseline_total > Decimal::ZERO {
                    baseline_value / baseline_total * hundred
                } else {
                    Decimal::ZERO
                };
                let delta_raw = percentage - baseline_pct;
                let delta = if delta_raw.abs() >= threshold {
                    Some(delta_raw.round_dp(DISPLAY_DECIMAL_PRECISION))
                } else {
                    None
                };

                let positions = Self::drill_down(
                    baseline,
                    &scoped,
                    dimension,
                    &label,
                    value,
                    combined_total,
                    global_total,
                );

                LabelAllocation {
                    label,
                    value,
                    percentage: percentage.round_dp(DISPLAY_DECIMAL_PRECISION),
                    delta,
                    positions,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.value.cmp(&a.value));

        AllocationBreakdown {
            dimension,
            entries,
            combined_total,
            baseline_total,
        }
    }

    /// Position-level detail for one expanded label: baseline positions
    /// and in-scope simulated items, each with its segment / scope /
    /// global share.
    fn drill_down(
        baseline: &BaselineAllocation,
        scoped_items: &[&SimulatedItem],
        dimension: Dimension,
        label: &str,
        segment_value: Decimal,
        combined_total: Decimal,
        global_total: Decimal,
    ) -> Vec<PositionDetail> {
        let hundred = Decimal::from(100);
        let pct = |value: Decimal, total: Decimal| -> Decimal {
            if total > Decimal::ZERO {
                (value / total * hundred).round_dp(DISPLAY_DECIMAL_PRECISION)
            } else {
                Decimal::ZERO
            }
        };

        let mut rows: Vec<PositionDetail> = baseline
            .positions
            .iter()
            .filter(|pos| normalize_or(pos.label(dimension), dimension.fallback_label()) == label)
            .map(|pos| PositionDetail {
                ticker: pos.ticker.clone(),
                name: pos.name.clone(),
                value: pos.value,
                is_simulated: false,
                pct_of_segment: pct(pos.value, segment_value),
                pct_of_scope: pct(pos.value, combined_total),
                pct_of_global: pct(pos.value, global_total),
            })
            .collect();

        for item in scoped_items {
            if item.label_for(dimension) == label && item.value > Decimal::ZERO {
                rows.push(PositionDetail {
                    ticker: item.ticker.trim().to_string(),
                    name: item.display_name(),
                    value: item.value,
                    is_simulated: true,
                    pct_of_segment: pct(item.value, segment_value),
                    pct_of_scope: pct(item.value, combined_total),
                    pct_of_global: pct(item.value, global_total),
                });
            }
        }

        rows.sort_by(|a, b| b.value.cmp(&a.value));
        rows
    }

    /// Recomputes the derived value of every percentage-mode item against
    /// the given baseline.
    ///
    /// The caller invokes this whenever an item's target percent, its
    /// labels, its mode, or the baseline itself change. Absolute-mode
    /// items keep their value; any stale warning is cleared.
    pub fn revalue_items(&self, items: &mut [SimulatedItem], baseline: &BaselineAllocation) {
        debug!("Revaluing {} simulated item(s)", items.len());
        for item in items.iter_mut() {
            match item.value_mode {
                ValueMode::Absolute => {
                    item.warning = None;
                }
                ValueMode::Percentage => {
                    let bucket = baseline.bucket_value(item.source, item.source_label());
                    let result = solve_required_addition(&TargetSolveInput {
                        baseline_value: bucket,
                        baseline_total: baseline.baseline_total(),
                        target_percent: item.target_percent.unwrap_or(Decimal::ZERO),
                    });
                    item.value = result.required_addition;
                    item.warning = result.warning;
                }
            }
        }
    }
}
