/// 금액 타입
/// 소수점 2자리, 최대 9자리(9,999,999.99)까지의 금액을 센트 단위 정수로 보관한다.
// region:    --- Imports
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Money
/// 허용되는 최대 금액 (센트)
pub const MAX_CENTS: i64 = 999_999_999;

// 정수부 최대 자리수 (전체 9자리 - 소수 2자리)
const MAX_WHOLE_DIGITS: usize = 7;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount is required")]
    Empty,
    #[error("amount is not a number")]
    Invalid,
    #[error("amount cannot be negative")]
    Negative,
    #[error("amount has more than two decimal places")]
    TooManyDecimals,
    #[error("amount is larger than 9,999,999.99")]
    TooLarge,
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// 폼 입력 문자열 파싱 ("12", "12.5", "12.50")
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(MoneyError::Empty);
        }
        if input.starts_with('-') {
            return Err(MoneyError::Negative);
        }

        let (whole, fraction) = match input.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MoneyError::Invalid);
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MoneyError::Invalid);
        }
        if fraction.len() > 2 {
            return Err(MoneyError::TooManyDecimals);
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > MAX_WHOLE_DIGITS {
            return Err(MoneyError::TooLarge);
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyError::Invalid)?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyError::Invalid)? * 10,
            _ => fraction.parse().map_err(|_| MoneyError::Invalid)?,
        };

        let cents = whole * 100 + fraction;
        if cents > MAX_CENTS {
            return Err(MoneyError::TooLarge);
        }
        Ok(Money(cents))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// endregion: --- Money

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_decimal_amounts() {
        assert_eq!(Money::parse("12").unwrap().cents(), 1200);
        assert_eq!(Money::parse("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse(" 12.05 ").unwrap().cents(), 1205);
        assert_eq!(Money::parse("0.99").unwrap().cents(), 99);
        assert_eq!(Money::parse("12.").unwrap().cents(), 1200);
        assert_eq!(Money::parse("0007").unwrap().cents(), 700);
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(Money::parse(""), Err(MoneyError::Empty));
        assert_eq!(Money::parse("abc"), Err(MoneyError::Invalid));
        assert_eq!(Money::parse(".50"), Err(MoneyError::Invalid));
        assert_eq!(Money::parse("1.2.3"), Err(MoneyError::Invalid));
        assert_eq!(Money::parse("-1"), Err(MoneyError::Negative));
        assert_eq!(Money::parse("1.234"), Err(MoneyError::TooManyDecimals));
    }

    #[test]
    fn enforces_nine_digit_limit() {
        assert_eq!(Money::parse("9999999.99").unwrap().cents(), MAX_CENTS);
        assert_eq!(Money::parse("10000000"), Err(MoneyError::TooLarge));
        assert_eq!(
            Money::parse("99999999999999999999999"),
            Err(MoneyError::TooLarge)
        );
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_cents(1205).to_string(), "12.05");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn serializes_as_cents() {
        let value = serde_json::to_value(Money::from_cents(1205)).unwrap();
        assert_eq!(value, serde_json::json!(1205));
        let back: Money = serde_json::from_value(value).unwrap();
        assert_eq!(back, Money::from_cents(1205));
    }
}
