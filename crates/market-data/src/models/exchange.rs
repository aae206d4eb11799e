use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Exchange segment a quote request is addressed to.
///
/// The string form is the key the feed uses in request and response bodies.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ExchangeSegment {
    #[default]
    #[serde(rename = "NSE_EQ")]
    NseEquity,
    #[serde(rename = "BSE_EQ")]
    BseEquity,
    #[serde(rename = "NSE_FNO")]
    NseDerivatives,
    #[serde(rename = "IDX_I")]
    Index,
}

impl ExchangeSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NseEquity => "NSE_EQ",
            Self::BseEquity => "BSE_EQ",
            Self::NseDerivatives => "NSE_FNO",
            Self::Index => "IDX_I",
        }
    }
}

impl fmt::Display for ExchangeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeSegment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NSE_EQ" => Ok(Self::NseEquity),
            "BSE_EQ" => Ok(Self::BseEquity),
            "NSE_FNO" => Ok(Self::NseDerivatives),
            "IDX_I" => Ok(Self::Index),
            other => Err(format!("unknown exchange segment: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "nse_eq".parse::<ExchangeSegment>().unwrap(),
            ExchangeSegment::NseEquity
        );
        assert_eq!(
            " BSE_EQ ".parse::<ExchangeSegment>().unwrap(),
            ExchangeSegment::BseEquity
        );
    }

    #[test]
    fn test_parse_unknown_segment() {
        assert!("NYSE".parse::<ExchangeSegment>().is_err());
    }

    #[test]
    fn test_serde_uses_feed_keys() {
        let json = serde_json::to_string(&ExchangeSegment::NseEquity).unwrap();
        assert_eq!(json, "\"NSE_EQ\"");
    }
}
