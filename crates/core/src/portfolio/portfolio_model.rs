use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{Error, Result, ValidationError};
use crate::utils::labels::normalize_label;

/// A portfolio as supplied by the caller for one allocation run.
///
/// The tree is a read-only snapshot: every derived figure (targets, actions,
/// values after action) is computed fresh per run and returned on separate
/// output models, never written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub name: String,
    pub current_value: Decimal,
    /// Raw, unnormalized desired share of capital. Normalized to a
    /// percentage before use.
    pub target_weight: Decimal,
    /// Minimum number of positions this portfolio should hold. Shortfalls
    /// are represented as placeholder slots in a synthetic category.
    pub min_positions: usize,
    pub categories: Vec<PortfolioCategory>,
}

impl Portfolio {
    /// A portfolio participates in a run only with value and a positive weight.
    pub fn is_eligible(&self) -> bool {
        self.current_value > Decimal::ZERO && self.target_weight > Decimal::ZERO
    }

    /// Number of real positions across all categories.
    pub fn position_count(&self) -> usize {
        self.categories.iter().map(|c| c.positions.len()).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio name cannot be empty".to_string(),
            )));
        }
        if self.current_value < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Portfolio '{}' has a negative current value",
                self.name
            ))));
        }
        if self.target_weight < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Portfolio '{}' has a negative target weight",
                self.name
            ))));
        }
        for category in &self.categories {
            for position in &category.positions {
                position.validate()?;
            }
        }
        Ok(())
    }
}

/// A named group of positions within a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioCategory {
    pub name: String,
    pub positions: Vec<Position>,
}

impl PortfolioCategory {
    /// Sum of the category's position values.
    pub fn current_value(&self) -> Decimal {
        self.positions.iter().map(|p| p.current_value).sum()
    }
}

/// A single holding inside a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub name: String,
    pub current_value: Decimal,
    /// User-defined target share of the portfolio (0-100), when present.
    /// Builder weights matched by name take precedence over this field.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_allocation: Option<Decimal>,
}

impl Position {
    pub fn validate(&self) -> Result<()> {
        if self.current_value < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Position '{}' has a negative current value",
                self.name
            ))));
        }
        if let Some(target) = self.target_allocation {
            if target < Decimal::ZERO || target > Decimal::from(100) {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Target allocation for '{}' must be between 0 and 100",
                    self.name
                ))));
            }
        }
        Ok(())
    }
}

/// Builder-defined position weights, keyed by normalized position name.
///
/// The placeholder weight, when present, applies to every unfilled slot
/// (real positions without a weight and synthetic missing slots alike).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderWeights {
    pub weights: HashMap<String, Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub placeholder_weight: Option<Decimal>,
}

impl BuilderWeights {
    /// Builds the mapping, normalizing every key so case and whitespace
    /// variants of a company name match.
    pub fn new<I>(entries: I, placeholder_weight: Option<Decimal>) -> Self
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        let weights = entries
            .into_iter()
            .map(|(name, weight)| (normalize_label(&name), weight))
            .collect();
        Self {
            weights,
            placeholder_weight,
        }
    }

    /// Positive builder weight for a position name, if one is defined.
    pub fn weight_for(&self, name: &str) -> Option<Decimal> {
        self.weights
            .get(&normalize_label(name))
            .copied()
            .filter(|w| *w > Decimal::ZERO)
    }
}
