//! Inverse solve: the capital a bucket needs to reach a target share.
//!
//! For a bucket currently holding `B` of a total `T`, the addition `X`
//! that lifts the bucket to `P` percent satisfies (B + X) / (T + X) =
//! P / 100, so X = (P/100 * T - B) / (1 - P/100). Infeasible targets are
//! reported as warnings with a zero value, never as errors: one bad item
//! must not abort the caller's recomputation pass.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// Inputs for one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSolveInput {
    /// Current total already in the bucket.
    pub baseline_value: Decimal,
    /// Current total of the whole allocation.
    pub baseline_total: Decimal,
    /// Desired share of the bucket (percent).
    pub target_percent: Decimal,
}

/// Outcome of one solve: the rounded addition, or zero plus a warning when
/// the target cannot be reached by adding capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSolveResult {
    pub required_addition: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

impl TargetSolveResult {
    fn infeasible(warning: String) -> Self {
        TargetSolveResult {
            required_addition: Decimal::ZERO,
            warning: Some(warning),
        }
    }
}

/// Solves for the addition that lifts the bucket to the target share.
///
/// The edge cases are evaluated in order; the first match wins.
pub fn solve_required_addition(input: &TargetSolveInput) -> TargetSolveResult {
    let hundred = Decimal::from(100);
    let b = input.baseline_value;
    let t = input.baseline_total;
    let p = input.target_percent;

    if p >= hundred {
        return TargetSolveResult::infeasible(format!(
            "A target of {}% cannot be reached by adding capital",
            p
        ));
    }
    if p <= Decimal::ZERO {
        return TargetSolveResult {
            required_addition: Decimal::ZERO,
            warning: None,
        };
    }

    if t > Decimal::ZERO && b > Decimal::ZERO {
        let current_percent = b / t * hundred;
        if p <= current_percent {
            return TargetSolveResult::infeasible(format!(
                "Already at {}% - a lower target would require selling",
                current_percent.round_dp(DISPLAY_DECIMAL_PRECISION)
            ));
        }
    }

    let ratio = p / hundred;
    let denominator = Decimal::ONE - ratio;
    if denominator <= Decimal::ZERO {
        // Unreachable after the >= 100 check above.
        debug!("Non-positive solver denominator for target {}%", p);
        return TargetSolveResult::infeasible(format!(
            "A target of {}% cannot be reached by adding capital",
            p
        ));
    }

    let addition = (ratio * t - b) / denominator;
    if addition < Decimal::ZERO {
        return TargetSolveResult::infeasible(format!(
            "Reaching {}% would require removing {} from this bucket",
            p,
            (-addition).round_dp(DISPLAY_DECIMAL_PRECISION)
        ));
    }

    TargetSolveResult {
        required_addition: addition.round_dp(DISPLAY_DECIMAL_PRECISION),
        warning: None,
    }
}
