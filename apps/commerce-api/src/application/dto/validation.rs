//! Field rules shared by the request DTOs.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::shared::{Money, ValidationError};

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Require a well-formed email address.
pub(crate) fn email(field: &str, value: &str) -> Result<(), ValidationError> {
    if email_regex().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, "must be a valid email address"))
    }
}

/// Require `min..=max` characters.
pub(crate) fn length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("length must be between {min} and {max}, got {len}"),
        ))
    }
}

/// Require a price of zero or more.
pub(crate) fn price(field: &str, value: Decimal) -> Result<Money, ValidationError> {
    let money = Money::new(value);
    money.ensure_non_negative(field)?;
    Ok(money)
}

/// Require an integer in `0..=u32::MAX`.
pub(crate) fn non_negative_count(field: &str, value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| {
        if value < 0 {
            ValidationError::new(field, "must be greater than or equal to 0")
        } else {
            ValidationError::new(field, "is too large")
        }
    })
}

/// Require an integer in `1..=u32::MAX`.
pub(crate) fn positive_count(field: &str, value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    u32::try_from(value).map_err(|_| ValidationError::new(field, "is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case("ada@example.com", true ; "plain address")]
    #[test_case("a.b+c@mail.example.org", true ; "dotted and tagged")]
    #[test_case("ada@example", false ; "no top level domain")]
    #[test_case("ada example.com", false ; "no at sign")]
    #[test_case("", false ; "empty")]
    fn email_rule(value: &str, ok: bool) {
        assert_eq!(email("email", value).is_ok(), ok);
    }

    #[test_case("", false ; "empty")]
    #[test_case("a", true ; "one char")]
    #[test_case("가나다", true ; "counts characters not bytes")]
    fn length_rule(value: &str, ok: bool) {
        assert_eq!(length("firstName", value, 1, 3).is_ok(), ok);
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = price("price", dec!(-0.01)).unwrap_err();
        assert_eq!(err.field, "price");
        assert!(price("price", Decimal::ZERO).is_ok());
    }

    #[test_case(-1, false ; "negative")]
    #[test_case(0, true ; "zero")]
    #[test_case(i64::from(u32::MAX) + 1, false ; "too large")]
    fn non_negative_count_rule(value: i64, ok: bool) {
        assert_eq!(non_negative_count("stock", value).is_ok(), ok);
    }

    #[test_case(0, false ; "zero")]
    #[test_case(-3, false ; "negative")]
    #[test_case(1, true ; "one")]
    fn positive_count_rule(value: i64, ok: bool) {
        assert_eq!(positive_count("quantity", value).is_ok(), ok);
    }
}
