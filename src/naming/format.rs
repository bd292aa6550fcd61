//! Number rendering used by template operators.

use rust_decimal::Decimal;

/// English ordinal: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`, ...
pub fn ordinal(n: i64) -> String {
    let abs = n.unsigned_abs();
    let suffix = match (abs % 100, abs % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Value with an explicit sign; zero has none.
pub fn signed(value: Decimal) -> String {
    if value.is_zero() {
        "0".to_string()
    } else if value.is_sign_positive() {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ordinal_suffixes() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (5, "5th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (24, "24th"),
            (101, "101st"),
            (111, "111th"),
            (112, "112th"),
            (0, "0th"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected, "ordinal({n})");
        }
    }

    #[test]
    fn signed_values() {
        assert_eq!(signed(dec!(1.5)), "+1.5");
        assert_eq!(signed(dec!(-1.5)), "-1.5");
        assert_eq!(signed(dec!(0)), "0");
        assert_eq!(signed(-dec!(0.0)), "0");
        assert_eq!(signed(dec!(2.25)), "+2.25");
    }
}
