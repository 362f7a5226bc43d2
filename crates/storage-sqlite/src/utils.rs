//! Utility functions for SQLite storage operations.
//!
//! Token amounts and rates are stored as decimal TEXT so they round-trip
//! without binary floating point.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Parses a decimal TEXT column, failing loudly on corrupt data.
pub(crate) fn parse_decimal(value: &str, column: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        log::error!("Failed to parse {} '{}' as a decimal: {}", column, value, e);
        StorageError::CorruptValue(format!("{} '{}': {}", column, value, e))
    })
}

pub(crate) fn parse_optional_decimal(
    value: Option<&str>,
    column: &str,
) -> Result<Option<Decimal>, StorageError> {
    value.map(|v| parse_decimal(v, column)).transpose()
}
