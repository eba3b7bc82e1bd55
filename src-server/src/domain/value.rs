//! Lead Value
//!
//! Monetary value of a lead, held as integer cents. Mirrors a
//! `decimal(10, 2)` column: at most 8 integer digits and 2 decimals.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::entity::DomainError;

const MAX_CENTS: i64 = 9_999_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LeadValue(i64);

impl LeadValue {
    pub const ZERO: LeadValue = LeadValue(0);

    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if !(0..=MAX_CENTS).contains(&cents) {
            return Err(DomainError::InvalidInput(format!(
                "Value out of range: {} cents",
                cents
            )));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Sum for totals; saturates instead of overflowing.
    pub fn saturating_add(self, other: LeadValue) -> LeadValue {
        LeadValue(self.0.saturating_add(other.0))
    }

    /// Normalize raw form input: empty or whitespace-only means no value.
    pub fn normalize(raw: Option<&str>) -> Result<Option<LeadValue>, DomainError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some),
        }
    }
}

impl FromStr for LeadValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidInput(format!("Invalid value: {:?}", s));
        let text = s.trim();

        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || whole.len() > 8 {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        LeadValue::from_cents(whole * 100 + frac)
    }
}

impl fmt::Display for LeadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for LeadValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LeadValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = ValueInput::deserialize(deserializer)?;
        raw.as_text().parse().map_err(serde::de::Error::custom)
    }
}

/// Value as sent by clients: form fields arrive as text, JSON clients may
/// send numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueInput {
    Text(String),
    Number(serde_json::Number),
}

impl ValueInput {
    pub fn as_text(&self) -> String {
        match self {
            ValueInput::Text(s) => s.clone(),
            ValueInput::Number(n) => n.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("50.00".parse::<LeadValue>().unwrap().cents(), 5000);
        assert_eq!("50".parse::<LeadValue>().unwrap().to_string(), "50.00");
        assert_eq!("1234.5".parse::<LeadValue>().unwrap().to_string(), "1234.50");
        assert_eq!(".75".parse::<LeadValue>().unwrap().cents(), 75);
        assert_eq!(" 7.05 ".parse::<LeadValue>().unwrap().to_string(), "7.05");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["abc", "1.234", "-5", "1,50", ".", "123456789.00"] {
            assert!(bad.parse::<LeadValue>().is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn test_normalize_blank_is_none() {
        assert_eq!(LeadValue::normalize(Some("  ")).unwrap(), None);
        assert_eq!(LeadValue::normalize(Some("")).unwrap(), None);
        assert_eq!(LeadValue::normalize(None).unwrap(), None);
        assert_eq!(
            LeadValue::normalize(Some("12.3")).unwrap(),
            Some(LeadValue::from_cents(1230).unwrap())
        );
    }

    #[test]
    fn test_serde_as_string() {
        let value = LeadValue::from_cents(5000).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"50.00\"");
        let from_number: LeadValue = serde_json::from_str("19.9").unwrap();
        assert_eq!(from_number.cents(), 1990);
    }
}
