// Tests for position target resolution and missing-position synthesis.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::MISSING_POSITIONS_CATEGORY;
use crate::portfolio::{BuilderWeights, Portfolio, PortfolioCategory, Position};
use crate::rebalancing::resolve_position_targets;

fn position(name: &str, value: Decimal, target: Option<Decimal>) -> Position {
    Position {
        name: name.to_string(),
        current_value: value,
        target_allocation: target,
    }
}

fn portfolio_with(min_positions: usize, positions: Vec<Position>) -> Portfolio {
    Portfolio {
        id: 1,
        name: "Growth".to_string(),
        current_value: positions.iter().map(|p| p.current_value).sum(),
        target_weight: dec!(100),
        min_positions,
        categories: vec![PortfolioCategory {
            name: "Equities".to_string(),
            positions,
        }],
    }
}

#[test]
fn builder_weight_wins_over_user_allocation() {
    let portfolio = portfolio_with(
        0,
        vec![position("Acme Corp", dec!(500), Some(dec!(10)))],
    );
    let builder = BuilderWeights::new(vec![("  ACME corp ".to_string(), dec!(35))], None);

    let resolved = resolve_position_targets(&portfolio, Some(&builder));
    assert_eq!(resolved[0].positions[0].target_allocation, dec!(35));
}

#[test]
fn user_allocation_used_when_builder_has_no_match() {
    let portfolio = portfolio_with(0, vec![position("Acme Corp", dec!(500), Some(dec!(10)))]);
    let builder = BuilderWeights::new(vec![("Other Co".to_string(), dec!(35))], None);

    let resolved = resolve_position_targets(&portfolio, Some(&builder));
    assert_eq!(resolved[0].positions[0].target_allocation, dec!(10));
}

#[test]
fn remaining_allocation_is_split_equally_over_unweighted_slots() {
    // 40% defined, three slots without a weight (one real + two missing).
    let portfolio = portfolio_with(
        3,
        vec![
            position("Acme Corp", dec!(500), Some(dec!(40))),
            position("Beta Ltd", dec!(300), None),
        ],
    );

    let resolved = resolve_position_targets(&portfolio, None);
    assert_eq!(resolved[0].positions[1].target_allocation, dec!(20));

    let missing = &resolved[1];
    assert_eq!(missing.name, MISSING_POSITIONS_CATEGORY);
    assert_eq!(missing.positions.len(), 2);
    for slot in &missing.positions {
        assert!(slot.is_placeholder);
        assert_eq!(slot.current_value, Decimal::ZERO);
        assert_eq!(slot.target_allocation, dec!(20));
    }
}

#[test]
fn placeholder_weight_applies_to_every_unfilled_slot() {
    let portfolio = portfolio_with(2, vec![position("Acme Corp", dec!(500), Some(dec!(80)))]);
    let builder = BuilderWeights::new(Vec::new(), Some(dec!(5)));

    let resolved = resolve_position_targets(&portfolio, Some(&builder));
    let missing = &resolved[1];
    assert_eq!(missing.positions.len(), 1);
    assert_eq!(missing.positions[0].target_allocation, dec!(5));
}

#[test]
fn fully_allocated_portfolio_zeroes_its_placeholder_slots() {
    // Real positions already cover 100%; the slots still render but carry
    // no target.
    let portfolio = portfolio_with(
        3,
        vec![
            position("Acme Corp", dec!(600), Some(dec!(60))),
            position("Beta Ltd", dec!(400), Some(dec!(40))),
        ],
    );

    let resolved = resolve_position_targets(&portfolio, None);
    let missing = &resolved[1];
    assert_eq!(missing.positions.len(), 1);
    assert_eq!(missing.positions[0].target_allocation, Decimal::ZERO);
}

#[test]
fn no_missing_category_when_minimum_is_met() {
    let portfolio = portfolio_with(1, vec![position("Acme Corp", dec!(500), None)]);

    let resolved = resolve_position_targets(&portfolio, None);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "Equities");
}

#[test]
fn overdefined_weights_leave_nothing_to_distribute() {
    let portfolio = portfolio_with(
        0,
        vec![
            position("Acme Corp", dec!(500), Some(dec!(70))),
            position("Beta Ltd", dec!(300), Some(dec!(50))),
            position("Gamma AG", dec!(200), None),
        ],
    );

    let resolved = resolve_position_targets(&portfolio, None);
    assert_eq!(resolved[0].positions[2].target_allocation, Decimal::ZERO);
}

#[test]
fn slot_names_are_deterministic() {
    let portfolio = portfolio_with(2, Vec::new());

    let first = resolve_position_targets(&portfolio, None);
    let second = resolve_position_targets(&portfolio, None);
    let names: Vec<_> = first[1].positions.iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["Open slot 1", "Open slot 2"]);
    assert_eq!(
        names,
        second[1]
            .positions
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>()
    );
}
