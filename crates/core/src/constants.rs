/// Decimal precision for money amounts and percentages handed back to callers
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Name of the synthetic category holding placeholder slots
pub const MISSING_POSITIONS_CATEGORY: &str = "Missing Positions";

/// Bucket label for unclassified countries and sectors
pub const UNKNOWN_LABEL: &str = "unknown";

/// Bucket label for positions without a thesis
pub const UNASSIGNED_LABEL: &str = "unassigned";

/// Sentinel the UI sends for "no label" (em dash)
pub const EMPTY_LABEL_SENTINEL: &str = "\u{2014}";

/// Minimum percentage-point move surfaced as a delta from baseline
pub const DELTA_THRESHOLD: &str = "0.1";
