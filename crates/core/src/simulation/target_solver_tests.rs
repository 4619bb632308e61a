// Tests for the percentage target solver and its edge-case ladder.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::simulation::{solve_required_addition, TargetSolveInput};

fn solve(b: Decimal, t: Decimal, p: Decimal) -> crate::simulation::TargetSolveResult {
    solve_required_addition(&TargetSolveInput {
        baseline_value: b,
        baseline_total: t,
        target_percent: p,
    })
}

#[test]
fn solves_the_required_addition() {
    // (0.3 * 1000 - 200) / (1 - 0.3) = 100 / 0.7
    let result = solve(dec!(200), dec!(1000), dec!(30));
    assert_eq!(result.required_addition, dec!(142.86));
    assert!(result.warning.is_none());
}

#[test]
fn round_trip_reproduces_the_target() {
    let result = solve(dec!(200), dec!(1000), dec!(30));
    let x = result.required_addition;
    let reached = (dec!(200) + x) / (dec!(1000) + x) * dec!(100);
    assert!((reached - dec!(30)).abs() < dec!(0.1), "reached {}", reached);
}

#[test]
fn target_below_current_share_is_infeasible() {
    // Already at 40%; 30% is unreachable without a sell.
    let result = solve(dec!(400), dec!(1000), dec!(30));
    assert_eq!(result.required_addition, Decimal::ZERO);
    let warning = result.warning.expect("warning");
    assert!(warning.contains("40"), "warning was: {}", warning);
}

#[test]
fn target_of_one_hundred_or_more_is_invalid() {
    let result = solve(dec!(100), dec!(1000), dec!(100));
    assert_eq!(result.required_addition, Decimal::ZERO);
    assert!(result.warning.is_some());

    let result = solve(dec!(100), dec!(1000), dec!(150));
    assert_eq!(result.required_addition, Decimal::ZERO);
    assert!(result.warning.is_some());
}

#[test]
fn non_positive_target_is_a_silent_zero() {
    let result = solve(dec!(100), dec!(1000), dec!(0));
    assert_eq!(result.required_addition, Decimal::ZERO);
    assert!(result.warning.is_none());

    let result = solve(dec!(100), dec!(1000), dec!(-5));
    assert_eq!(result.required_addition, Decimal::ZERO);
    assert!(result.warning.is_none());
}

#[test]
fn empty_allocation_needs_nothing() {
    // Nothing held anywhere: any share of zero is zero.
    let result = solve(dec!(0), dec!(0), dec!(50));
    assert_eq!(result.required_addition, Decimal::ZERO);
    assert!(result.warning.is_none());
}

#[test]
fn value_in_an_empty_total_requires_removal() {
    // B > 0 with T = 0 can only be solved by removing capital.
    let result = solve(dec!(250), dec!(0), dec!(50));
    assert_eq!(result.required_addition, Decimal::ZERO);
    assert!(result.warning.expect("warning").contains("removing"));
}

#[test]
fn empty_bucket_in_a_funded_total_is_solvable() {
    // (0.25 * 1000 - 0) / 0.75
    let result = solve(dec!(0), dec!(1000), dec!(25));
    assert_eq!(result.required_addition, dec!(333.33));
    assert!(result.warning.is_none());
}

#[test]
fn result_is_rounded_to_cents() {
    let result = solve(dec!(0), dec!(1000), dec!(33.3));
    // 333 / 0.667 = 499.25...
    assert_eq!(result.required_addition, result.required_addition.round_dp(2));
}
