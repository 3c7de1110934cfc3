//! Line-amount derivation.
//!
//! Raw form input is coerced, never rejected: malformed or negative
//! quantities and rates collapse to zero so an in-progress edit can't wedge
//! the document. Rounding is display-only; persisted values keep their
//! full precision.

use rust_decimal::Decimal;

/// `quantity × rate`, with out-of-domain factors treated as zero.
pub fn line_amount(quantity: Decimal, rate: Decimal) -> Decimal {
    sanitize(quantity) * sanitize(rate)
}

/// Coerces raw field input to a non-negative decimal; anything else is zero.
pub fn parse_decimal_or_zero(raw: &str) -> Decimal {
    raw.trim()
        .parse::<Decimal>()
        .map(sanitize)
        .unwrap_or(Decimal::ZERO)
}

/// Two-decimal fixed formatting for summary/footer totals.
pub fn format_total(total: Decimal) -> String {
    format!("{:.2}", total)
}

fn sanitize(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_is_product_of_factors() {
        assert_eq!(line_amount(dec!(2), dec!(50)), dec!(100));
        assert_eq!(line_amount(dec!(2.5), dec!(10.4)), dec!(26.0));
    }

    #[test]
    fn negative_factors_collapse_to_zero() {
        assert_eq!(line_amount(dec!(-2), dec!(50)), Decimal::ZERO);
        assert_eq!(line_amount(dec!(2), dec!(-1)), Decimal::ZERO);
    }

    #[test]
    fn raw_input_coercion() {
        assert_eq!(parse_decimal_or_zero("3"), dec!(3));
        assert_eq!(parse_decimal_or_zero(" 2.75 "), dec!(2.75));
        assert_eq!(parse_decimal_or_zero(""), Decimal::ZERO);
        assert_eq!(parse_decimal_or_zero("12x"), Decimal::ZERO);
        assert_eq!(parse_decimal_or_zero("-4"), Decimal::ZERO);
    }

    #[test]
    fn totals_format_to_two_decimals() {
        assert_eq!(format_total(dec!(100)), "100.00");
        assert_eq!(format_total(dec!(12.5)), "12.50");
    }
}
