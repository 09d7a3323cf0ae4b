use rust_decimal::Decimal;

/// Formats a decimal amount as US dollars: `usd(dec!(1234.5))` -> `"$1,234.50"`.
///
/// Negative amounts render with a leading sign (`-$250.00`). Amounts are
/// rounded to cents with banker's rounding before formatting.
pub fn usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let formatted = format!("{:.2}", rounded.abs());

    // Group the integer digits in threes.
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_plain_amounts() {
        assert_eq!(usd(dec!(0)), "$0.00");
        assert_eq!(usd(dec!(50)), "$50.00");
        assert_eq!(usd(dec!(9500.5)), "$9,500.50");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(usd(dec!(10000)), "$10,000.00");
        assert_eq!(usd(dec!(1234567.89)), "$1,234,567.89");
    }

    #[test]
    fn negative_amounts_carry_the_sign() {
        assert_eq!(usd(dec!(-250)), "-$250.00");
        assert_eq!(usd(dec!(-0.004)), "$0.00");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(usd(dec!(0.005)), "$0.00");
        assert_eq!(usd(dec!(0.015)), "$0.02");
        assert_eq!(usd(dec!(49.999)), "$50.00");
    }
}
