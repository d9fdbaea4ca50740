//! Amount precision rules.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Ledger lines keep 4 fractional digits so that percentage-rate computations
//! upstream can be posted without rounding; posting requests arriving from other
//! services carry at most 2 fractional digits.

use rust_decimal::Decimal;

/// Fractional digits stored on a journal entry line.
pub const LEDGER_SCALE: u32 = 4;

/// Fractional digits accepted on a policy posting request.
pub const REQUEST_SCALE: u32 = 2;

/// Integer digits a journal entry line can hold (`NUMERIC(21,4)`).
pub const LEDGER_MAX_INTEGER_DIGITS: usize = 17;

/// Integer digits accepted on a policy posting request.
pub const REQUEST_MAX_INTEGER_DIGITS: usize = LEDGER_MAX_INTEGER_DIGITS;

/// Returns the number of significant fractional digits (trailing zeros ignored).
#[must_use]
pub fn fractional_digits(amount: Decimal) -> u32 {
    amount.normalize().scale()
}

/// Returns the number of digits left of the decimal point (zero for `0.x`).
#[must_use]
pub fn integer_digits(amount: Decimal) -> usize {
    let integral = amount.abs().trunc();
    if integral.is_zero() {
        0
    } else {
        integral.normalize().to_string().len()
    }
}

/// Returns true if the amount is strictly positive and fits a ledger line column.
#[must_use]
pub fn is_valid_line_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO
        && fractional_digits(amount) <= LEDGER_SCALE
        && integer_digits(amount) <= LEDGER_MAX_INTEGER_DIGITS
}

/// Returns true if the amount is strictly positive and fits the request limits.
#[must_use]
pub fn is_valid_request_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO
        && fractional_digits(amount) <= REQUEST_SCALE
        && integer_digits(amount) <= REQUEST_MAX_INTEGER_DIGITS
}
