//! Portfolio module - read-only projections over a user's investments.

mod projection_engine;
mod projection_model;

#[cfg(test)]
mod projection_engine_tests;

pub use projection_engine::project;
pub use projection_model::{PortfolioProjection, PortfolioSummary};
