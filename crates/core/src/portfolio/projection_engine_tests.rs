use super::*;
use crate::investments::{Investment, InvestmentDetail};
use crate::reactors::Reactor;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn detail(reactor_id: &str, name: &str, rate: Decimal, carbon: Decimal, amount: Decimal) -> InvestmentDetail {
    InvestmentDetail {
        investment: Investment {
            id: format!("inv-{}-{}", reactor_id, amount),
            user_id: "user-1".to_string(),
            reactor_id: reactor_id.to_string(),
            amount,
            created_at: NaiveDateTime::default(),
        },
        reactor: Reactor {
            id: reactor_id.to_string(),
            slug: name.to_lowercase(),
            name: name.to_string(),
            reactor_type: "SMR".to_string(),
            description: String::new(),
            location: String::new(),
            image_url: None,
            display_order: 1,
            annual_roi_rate: rate,
            carbon_offset_rate: carbon,
            total_funding_needed: dec!(1000000),
            current_funding: Decimal::ZERO,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        },
    }
}

#[test]
fn test_empty_portfolio() {
    let summary = project(&[]);
    assert_eq!(summary.total_invested, Decimal::ZERO);
    assert_eq!(summary.investment_count, 0);
    assert!(summary.reactors_invested_in.is_empty());
    assert!(summary.projections.is_empty());
    assert!(summary.wallet.is_none());
}

#[test]
fn test_all_horizons_are_projected() {
    let summary = project(&[
        detail("a", "NuWave", dec!(0.0450), dec!(0.85), dec!(10000)),
        detail("b", "Phoenix", dec!(0.0680), dec!(1.15), dec!(5000)),
    ]);

    let years: Vec<u32> = summary.projections.iter().map(|p| p.time_period_years).collect();
    assert_eq!(years, vec![1, 2, 5, 10]);

    let one = &summary.projections[0];
    assert_eq!(one.total_roi, dec!(790));
    assert_eq!(one.total_carbon_offset, dec!(14250));
    assert_eq!(one.total_return, dec!(15790));
    assert_eq!(one.roi_percentage, dec!(5.2667));

    let ten = &summary.projections[3];
    assert_eq!(ten.total_roi, dec!(7900));
    assert_eq!(ten.total_carbon_offset, dec!(142500));
    assert_eq!(ten.total_return, dec!(22900));
}

#[test]
fn test_negative_rate_reduces_return() {
    let summary = project(&[detail("h", "Helios", dec!(-0.0150), dec!(3.15), dec!(2000))]);

    let five = &summary.projections[2];
    assert_eq!(five.time_period_years, 5);
    assert_eq!(five.total_roi, dec!(-150));
    assert_eq!(five.total_return, dec!(1850));
    assert_eq!(five.roi_percentage, dec!(-7.5));
}

#[test]
fn test_reactor_names_are_distinct_in_first_seen_order() {
    let summary = project(&[
        detail("b", "Phoenix", dec!(0.068), dec!(1), dec!(10)),
        detail("a", "NuWave", dec!(0.045), dec!(1), dec!(20)),
        detail("b", "Phoenix", dec!(0.068), dec!(1), dec!(30)),
    ]);

    assert_eq!(summary.investment_count, 3);
    assert_eq!(summary.total_invested, dec!(60));
    assert_eq!(
        summary.reactors_invested_in,
        vec!["Phoenix".to_string(), "NuWave".to_string()]
    );
}
