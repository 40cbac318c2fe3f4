//! Checked decimal arithmetic for resource updates.
//!
//! [`Decimal`] panics on overflow with the plain operators, so every
//! resource update goes through these helpers and surfaces an
//! [`ArithmeticError`] naming the computation instead.

use rust_decimal::Decimal;

/// Values this close to a capacity are snapped onto it (`1e-9`).
pub const SNAP_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// A decimal computation left the representable range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("arithmetic overflow: {context}")]
pub struct ArithmeticError {
    /// What was being computed.
    pub context: &'static str,
}

/// `a + b`, or an error naming `context`.
pub fn add(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError { context })
}

/// `a - b`, or an error naming `context`.
pub fn sub(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError { context })
}

/// `a * b`, or an error naming `context`.
pub fn mul(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError { context })
}

/// `a / b`, or an error naming `context` (also on division by zero).
pub fn div(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, ArithmeticError> {
    a.checked_div(b).ok_or(ArithmeticError { context })
}

/// Clamp to `[0, 1]`.
pub fn clamp01(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

/// Floor at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn snap_epsilon_is_one_billionth() {
        assert_eq!(SNAP_EPSILON, dec!(0.000000001));
    }

    #[test]
    fn overflow_reports_context() {
        let err = add(Decimal::MAX, Decimal::ONE, "output production");
        assert_eq!(
            err,
            Err(ArithmeticError {
                context: "output production"
            })
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(div(Decimal::ONE, Decimal::ZERO, "ratio").is_err());
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp01(dec!(1.2)), Decimal::ONE);
        assert_eq!(clamp01(dec!(-0.1)), Decimal::ZERO);
        assert_eq!(clamp01(dec!(0.4)), dec!(0.4));
        assert_eq!(non_negative(dec!(-3)), Decimal::ZERO);
    }
}
