//! Rebalancing module - weight normalization, target values and buy/sell
//! actions under the three allocation policies.

mod rebalancing_model;
mod rebalancing_service;
mod target_resolver;
mod weight_normalizer;

pub use rebalancing_model::*;
pub use rebalancing_service::*;
pub use target_resolver::*;
pub use weight_normalizer::*;


#[cfg(test)]
mod target_resolver_tests;
