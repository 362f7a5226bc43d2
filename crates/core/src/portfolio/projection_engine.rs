use rust_decimal::prelude::*;
use std::collections::HashSet;

use super::projection_model::{PortfolioProjection, PortfolioSummary};
use crate::constants::{PERCENTAGE_DECIMAL_PLACES, PROJECTION_HORIZONS_YEARS};
use crate::investments::InvestmentDetail;

/// Projects `investments` over every reporting horizon.
///
/// Returns are linear and non-compounding. An empty input yields zero
/// aggregates and no projections.
pub fn project(investments: &[InvestmentDetail]) -> PortfolioSummary {
    if investments.is_empty() {
        return PortfolioSummary::default();
    }

    let total_invested: Decimal = investments.iter().map(|d| d.investment.amount).sum();

    let mut seen = HashSet::new();
    let reactors_invested_in = investments
        .iter()
        .filter(|d| seen.insert(d.reactor.id.as_str()))
        .map(|d| d.reactor.name.clone())
        .collect();

    let projections = PROJECTION_HORIZONS_YEARS
        .iter()
        .map(|&years| project_horizon(investments, total_invested, years))
        .collect();

    PortfolioSummary {
        total_invested,
        investment_count: investments.len(),
        reactors_invested_in,
        projections,
        wallet: None,
    }
}

fn project_horizon(
    investments: &[InvestmentDetail],
    total_invested: Decimal,
    years: u32,
) -> PortfolioProjection {
    let (total_roi, total_carbon_offset) = investments.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(roi, carbon), d| {
            let amount = d.investment.amount;
            (
                roi + d.reactor.roi_projection(amount, years),
                carbon + d.reactor.carbon_offset_projection(amount, years),
            )
        },
    );

    let roi_percentage = if total_invested > Decimal::ZERO {
        (total_roi / total_invested * Decimal::ONE_HUNDRED).round_dp_with_strategy(
            PERCENTAGE_DECIMAL_PLACES,
            RoundingStrategy::MidpointAwayFromZero,
        )
    } else {
        Decimal::ZERO
    };

    PortfolioProjection {
        time_period_years: years,
        total_roi,
        total_carbon_offset,
        total_return: total_invested + total_roi,
        roi_percentage,
    }
}
