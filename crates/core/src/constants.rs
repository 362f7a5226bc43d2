use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Balance every new account starts with, and the value a wallet reset restores.
pub const STARTING_BALANCE: Decimal = dec!(25000.00);

/// Smallest amount that can be committed to a reactor.
pub const MIN_INVESTMENT_AMOUNT: Decimal = dec!(0.01);

/// Upper bound (exclusive) for a single investment, matching a NUMERIC(10, 2) column.
pub const MAX_INVESTMENT_AMOUNT: Decimal = dec!(100000000);

/// Fractional digits allowed on token amounts
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Fractional digits kept on reactor rates
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Horizons (in years) reported by the portfolio summary.
pub const PROJECTION_HORIZONS_YEARS: [u32; 4] = [1, 2, 5, 10];

/// Fractional digits kept on portfolio ROI percentages
pub const PERCENTAGE_DECIMAL_PLACES: u32 = 4;
