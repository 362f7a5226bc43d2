use super::*;
use crate::errors::{Error, InvestmentError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_invalid(amount: Decimal) {
    match validate_amount(amount) {
        Err(Error::Investment(InvestmentError::InvalidAmount(_))) => {}
        other => panic!("expected InvalidAmount for {}, got {:?}", amount, other),
    }
}

#[test]
fn test_validate_amount_accepts_two_decimals() {
    assert!(validate_amount(dec!(0.01)).is_ok());
    assert!(validate_amount(dec!(10000)).is_ok());
    assert!(validate_amount(dec!(1234.56)).is_ok());
    // Trailing zeros do not count as fractional digits
    assert!(validate_amount(dec!(100.5000)).is_ok());
    assert!(validate_amount(dec!(99999999.99)).is_ok());
}

#[test]
fn test_validate_amount_rejects_bad_values() {
    assert_invalid(Decimal::ZERO);
    assert_invalid(dec!(-10));
    assert_invalid(dec!(0.001));
    assert_invalid(dec!(10.555));
    assert_invalid(dec!(100000000));
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(10000)), "10,000.00");
    assert_eq!(format_amount(dec!(25000.00)), "25,000.00");
    assert_eq!(format_amount(dec!(999.5)), "999.50");
    assert_eq!(format_amount(dec!(1234567.891)), "1,234,567.89");
    assert_eq!(format_amount(dec!(0.01)), "0.01");
    assert_eq!(format_amount(dec!(-1500)), "-1,500.00");
}

#[test]
fn test_investment_detail_serializes_flat_with_reactor() {
    use crate::reactors::Reactor;
    use chrono::NaiveDateTime;

    let detail = InvestmentDetail {
        investment: Investment {
            id: "inv-1".to_string(),
            user_id: "user-1".to_string(),
            reactor_id: "r-1".to_string(),
            amount: dec!(100),
            created_at: NaiveDateTime::default(),
        },
        reactor: Reactor {
            id: "r-1".to_string(),
            slug: "nuwave".to_string(),
            name: "NuWave".to_string(),
            reactor_type: "SMR".to_string(),
            description: String::new(),
            location: String::new(),
            image_url: None,
            display_order: 1,
            annual_roi_rate: dec!(0.045),
            carbon_offset_rate: dec!(0.85),
            total_funding_needed: dec!(180000),
            current_funding: Decimal::ZERO,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        },
    };

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["id"], "inv-1");
    assert_eq!(json["reactorId"], "r-1");
    assert_eq!(json["reactor"]["slug"], "nuwave");
}
