use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::{BuilderWeights, Portfolio};

// ============================================================================
// Input Models
// ============================================================================

/// Policy governing whether sells are permitted and whether new capital is
/// injected into the allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RebalanceMode {
    /// Redistribute existing capital only. The investment amount is forced
    /// to zero; sells and buys are both allowed.
    ExistingOnly,
    /// Distribute new capital across underweight portfolios. Never sells;
    /// capital beyond the total deficit stays unallocated.
    NewOnly,
    /// Full rebalance using new capital and liquidation of overweight
    /// portfolios.
    NewWithSells,
}

impl RebalanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceMode::ExistingOnly => "existing-only",
            RebalanceMode::NewOnly => "new-only",
            RebalanceMode::NewWithSells => "new-with-sells",
        }
    }
}

impl fmt::Display for RebalanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RebalanceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "existing-only" => Ok(RebalanceMode::ExistingOnly),
            "new-only" => Ok(RebalanceMode::NewOnly),
            "new-with-sells" => Ok(RebalanceMode::NewWithSells),
            other => Err(Error::Validation(ValidationError::UnknownRebalanceMode(
                other.to_string(),
            ))),
        }
    }
}

/// Inputs for one allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceInput {
    pub portfolios: Vec<Portfolio>,
    pub investment_amount: Decimal,
    pub mode: RebalanceMode,
    /// Builder-defined position weights, matched into every portfolio by
    /// normalized position name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub builder_weights: Option<BuilderWeights>,
}

impl RebalanceInput {
    pub fn validate(&self) -> Result<()> {
        if self.investment_amount < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Investment amount cannot be negative".to_string(),
            )));
        }
        for portfolio in &self.portfolios {
            portfolio.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// Result of one allocation run: per-portfolio targets and actions with the
/// category/position breakdown, plus run totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancePlan {
    pub mode: RebalanceMode,
    pub portfolios: Vec<PortfolioAllocation>,
    pub summary: RebalancePlanSummary,
}

/// Run totals across all portfolios in the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancePlanSummary {
    pub total_current_value: Decimal,
    pub new_total_value: Decimal,
    /// Sum of positive portfolio actions.
    pub total_buys: Decimal,
    /// Sum of negative portfolio actions, as a positive amount.
    pub total_sells: Decimal,
    /// New capital left over when every deficit is already funded
    /// (new-only mode); zero otherwise.
    pub unallocated: Decimal,
}

/// A portfolio annotated with the run's computed targets and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAllocation {
    pub portfolio_id: i64,
    pub name: String,
    pub current_value: Decimal,
    /// Normalized share of capital (percent, 0-100).
    pub normalized_weight: Decimal,
    pub target_value: Decimal,
    /// Signed money amount to move: positive = buy, negative = sell.
    pub action: Decimal,
    pub value_after_action: Decimal,
    /// Share of the combined post-action value (percent, 0-100).
    pub allocation_after_action: Decimal,
    pub categories: Vec<CategoryAllocation>,
}

/// A category annotated with aggregated position-level results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub name: String,
    pub current_value: Decimal,
    /// Sum of the resolved position targets (percent of portfolio).
    pub target_allocation: Decimal,
    pub calculated_target_value: Decimal,
    pub action: Decimal,
    pub value_after: Decimal,
    pub positions: Vec<PositionAllocation>,
}

/// A position annotated with its resolved target and action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAllocation {
    pub name: String,
    pub current_value: Decimal,
    /// Resolved target share of the portfolio (percent, 0-100).
    pub target_allocation: Decimal,
    pub calculated_target_value: Decimal,
    pub action: Decimal,
    pub value_after: Decimal,
    /// True for synthetic slots in the "Missing Positions" category.
    pub is_placeholder: bool,
}
