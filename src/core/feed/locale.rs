//! German (de-DE) number formatting for prices.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as `1.234,50€`.
pub fn format_euro(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let mut magnitude = rounded.abs();
    magnitude.rescale(2);
    let plain = magnitude.to_string();
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("{sign}{},{fraction}€", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn euro(raw: &str) -> String {
        format_euro(Decimal::from_str(raw).expect("decimal literal must parse"))
    }

    #[test]
    fn uses_comma_as_decimal_separator() {
        assert_eq!(euro("19.99"), "19,99€");
        assert_eq!(euro("0.5"), "0,50€");
        assert_eq!(euro("7"), "7,00€");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(euro("1234.5"), "1.234,50€");
        assert_eq!(euro("999.99"), "999,99€");
        assert_eq!(euro("1234567.891"), "1.234.567,89€");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(euro("2.005"), "2,01€");
        assert_eq!(euro("2.004"), "2,00€");
    }
}
