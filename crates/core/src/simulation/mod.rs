//! Simulation module - percentage target solving and combined
//! baseline-plus-additions breakdowns.

mod aggregation_service;
mod simulation_model;
mod target_solver;

pub use aggregation_service::*;
pub use simulation_model::*;
pub use target_solver::*;


#[cfg(test)]
mod target_solver_tests;
