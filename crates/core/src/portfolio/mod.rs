//! Portfolio input models for an allocation run.

mod portfolio_model;

pub use portfolio_model::*;
