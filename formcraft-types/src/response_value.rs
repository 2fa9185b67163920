use std::fmt;

use serde::{Deserialize, Serialize};

/// A single answer given by the respondent.
///
/// This is the value stored in `Responses` for each touched question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Free text, a URL, or the chosen option of a SingleSelect question.
    Text(String),

    /// A parsed number (from Number questions).
    Number(f64),
}

impl ResponseValue {
    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether this counts as "no answer" for completion and required checks.
    ///
    /// Text is blank when it is empty after trimming. A number is never blank, zero included.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Parse raw text typed into a Number field.
    ///
    /// Returns `None` for anything that is not a finite number; the input layer decides
    /// what to do with such text.
    pub fn parse_number(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Self::Number)
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Number(_) => "Number",
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for ResponseValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for ResponseValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for ResponseValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for ResponseValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_and_zero() {
        assert!(ResponseValue::from("   ").is_blank());
        assert!(!ResponseValue::from("x").is_blank());
        assert!(!ResponseValue::from(0).is_blank());
    }

    #[test]
    fn parse_number() {
        assert_eq!(ResponseValue::parse_number(" 42 "), Some(ResponseValue::Number(42.0)));
        assert_eq!(ResponseValue::parse_number("-1.5"), Some(ResponseValue::Number(-1.5)));
        assert_eq!(ResponseValue::parse_number("abc"), None);
        assert_eq!(ResponseValue::parse_number("inf"), None);
        assert_eq!(ResponseValue::parse_number(""), None);
    }

    #[test]
    fn untagged_json() {
        assert_eq!(serde_json::to_string(&ResponseValue::from("A")).unwrap(), "\"A\"");
        assert_eq!(serde_json::to_string(&ResponseValue::from(5)).unwrap(), "5.0");
        let parsed: ResponseValue = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, ResponseValue::Number(7.0));
    }
}
