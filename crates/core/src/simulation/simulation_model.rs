use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{UNASSIGNED_LABEL, UNKNOWN_LABEL};
use crate::utils::labels::{normalize_label, normalize_or};

// ============================================================================
// Baseline Models
// ============================================================================

/// A named money bucket within one breakdown dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValue {
    pub name: String,
    pub value: Decimal,
}

/// A baseline holding with its classification labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselinePosition {
    pub ticker: String,
    pub name: String,
    pub value: Decimal,
    pub country: String,
    pub sector: String,
    pub thesis: String,
}

impl BaselinePosition {
    /// Raw label of this position within a dimension.
    pub fn label(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Country => &self.country,
            Dimension::Sector => &self.sector,
            Dimension::Thesis => &self.thesis,
        }
    }
}

/// The already-held allocation, before any simulated addition.
///
/// Supplied by the caller as a snapshot of the active scope (one portfolio
/// or all of them); the engine never loads or stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineAllocation {
    pub countries: Vec<LabelValue>,
    pub sectors: Vec<LabelValue>,
    pub theses: Vec<LabelValue>,
    pub positions: Vec<BaselinePosition>,
    /// Portfolio total including cash, when available.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub portfolio_total: Option<Decimal>,
    /// Total excluding cash.
    pub total_value: Decimal,
}

impl BaselineAllocation {
    /// The total used as denominator for baseline percentages: the
    /// cash-inclusive portfolio total when available, else the ex-cash
    /// total.
    pub fn baseline_total(&self) -> Decimal {
        self.portfolio_total.unwrap_or(self.total_value)
    }

    /// Baseline value held under `label` within a dimension. Case and
    /// whitespace variants of the same label are summed together.
    pub fn label_value(&self, dimension: Dimension, label: &str) -> Decimal {
        let key = normalize_or(label, dimension.fallback_label());
        self.labels(dimension)
            .iter()
            .filter(|lv| normalize_or(&lv.name, dimension.fallback_label()) == key)
            .map(|lv| lv.value)
            .sum()
    }

    /// Baseline value already held in an item's source bucket. Ticker
    /// sources sum the matching baseline positions; the category sources
    /// look up the dimension arrays.
    pub fn bucket_value(&self, source: ItemSource, label: &str) -> Decimal {
        match source {
            ItemSource::Country => self.label_value(Dimension::Country, label),
            ItemSource::Sector => self.label_value(Dimension::Sector, label),
            ItemSource::Thesis => self.label_value(Dimension::Thesis, label),
            ItemSource::Ticker => {
                let key = normalize_label(label);
                self.positions
                    .iter()
                    .filter(|p| normalize_label(&p.ticker) == key)
                    .map(|p| p.value)
                    .sum()
            }
        }
    }

    pub fn labels(&self, dimension: Dimension) -> &[LabelValue] {
        match dimension {
            Dimension::Country => &self.countries,
            Dimension::Sector => &self.sectors,
            Dimension::Thesis => &self.theses,
        }
    }
}

/// A breakdown dimension of the simulated allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Country,
    Sector,
    Thesis,
}

impl Dimension {
    /// Bucket that collects blank or sentinel labels in this dimension.
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Dimension::Country | Dimension::Sector => UNKNOWN_LABEL,
            Dimension::Thesis => UNASSIGNED_LABEL,
        }
    }
}

// ============================================================================
// Simulated Items
// ============================================================================

/// How a simulated item's value is specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueMode {
    /// `value` is authoritative.
    Absolute,
    /// `value` is derived from `target_percent` by the solver.
    Percentage,
}

/// What kind of bucket a simulated item was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemSource {
    Ticker,
    Sector,
    Thesis,
    Country,
}

/// A hypothetical addition the user is experimenting with.
///
/// Mutable across a simulation session: the caller re-runs
/// `revalue_items` whenever the item, its baseline, or its mode changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedItem {
    pub id: i64,
    /// Money amount this item adds. Derived, never authoritative, while
    /// the item is in percentage mode.
    pub value: Decimal,
    /// Desired share of the source bucket (0-99.9), percentage mode only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_percent: Option<Decimal>,
    pub value_mode: ValueMode,
    pub country: String,
    pub sector: String,
    pub thesis: String,
    pub ticker: String,
    pub source: ItemSource,
    /// Portfolio the addition is earmarked for; `None` = unassigned.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub portfolio: Option<i64>,
    /// Infeasible-target note from the last revaluation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Value>,
}

impl SimulatedItem {
    /// Normalized bucket label of this item within a dimension.
    pub fn label_for(&self, dimension: Dimension) -> String {
        let raw = match dimension {
            Dimension::Country => &self.country,
            Dimension::Sector => &self.sector,
            Dimension::Thesis => &self.thesis,
        };
        normalize_or(raw, dimension.fallback_label())
    }

    /// Raw label of the bucket this item was created from.
    pub fn source_label(&self) -> &str {
        match self.source {
            ItemSource::Ticker => &self.ticker,
            ItemSource::Sector => &self.sector,
            ItemSource::Thesis => &self.thesis,
            ItemSource::Country => &self.country,
        }
    }

    pub fn in_scope(&self, scope: AllocationScope) -> bool {
        match scope {
            AllocationScope::Global => true,
            AllocationScope::Portfolio { portfolio_id } => self.portfolio == Some(portfolio_id),
        }
    }

    /// Display name for drill-down rows: the ticker when present, else the
    /// label the item was created from.
    pub fn display_name(&self) -> String {
        let ticker = self.ticker.trim();
        if !ticker.is_empty() {
            ticker.to_string()
        } else {
            self.source_label().trim().to_string()
        }
    }
}

/// Whether an aggregation considers all portfolios or one specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
pub enum AllocationScope {
    Global,
    #[serde(rename_all = "camelCase")]
    Portfolio { portfolio_id: i64 },
}

/// Inputs for one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationInput {
    pub baseline: BaselineAllocation,
    pub items: Vec<SimulatedItem>,
    #[serde(flatten)]
    pub scope: AllocationScope,
    /// Sum of every portfolio's value, independent of the active scope.
    /// Falls back to the baseline total when absent (global scope).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub global_portfolio_total: Option<Decimal>,
}

// ============================================================================
// Breakdown Output Models
// ============================================================================

/// One drill-down row under a label: a baseline position or a simulated
/// addition, with its share at segment, scope and global level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetail {
    pub ticker: String,
    pub name: String,
    pub value: Decimal,
    pub is_simulated: bool,
    /// Share within the expanded label (percent, 0-100).
    pub pct_of_segment: Decimal,
    /// Share of the active scope's combined total.
    pub pct_of_scope: Decimal,
    /// Share of every portfolio plus every simulated item, regardless of
    /// scope.
    pub pct_of_global: Decimal,
}

/// Per-label total with its share of the combined allocation and the move
/// against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAllocation {
    pub label: String,
    pub value: Decimal,
    /// Share of the combined total (percent, 0-100).
    pub percentage: Decimal,
    /// Move against the baseline share, surfaced only at >= 0.1
    /// percentage points.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delta: Option<Decimal>,
    pub positions: Vec<PositionDetail>,
}

/// Breakdown of one dimension: baseline plus in-scope simulated items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBreakdown {
    pub dimension: Dimension,
    /// Per-label entries, sorted by value descending.
    pub entries: Vec<LabelAllocation>,
    pub combined_total: Decimal,
    pub baseline_total: Decimal,
}

/// All three dimensions of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationBreakdowns {
    pub countries: AllocationBreakdown,
    pub sectors: AllocationBreakdown,
    pub theses: AllocationBreakdown,
    pub combined_total: Decimal,
}
