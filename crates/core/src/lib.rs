//! Folioplan Core - Allocation computation engine.
//!
//! Pure numeric logic for portfolio planning: rebalancing plans under
//! three policies (including synthetic missing-position slots), inverse
//! percentage-target solving, and combined baseline-plus-simulation
//! breakdowns by country, sector and thesis.
//!
//! The engine is synchronous and stateless. Callers supply snapshots of
//! portfolio data and own when to recompute; identical inputs always
//! produce identical outputs.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod rebalancing;
pub mod simulation;
pub mod utils;

// Re-export common types from the domain modules
pub use portfolio::*;
pub use rebalancing::*;
pub use simulation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
