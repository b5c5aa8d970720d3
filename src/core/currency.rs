//! Supported currency codes

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::UnknownCurrency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Uah,
    Rub,
    Usdt,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 5] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Uah,
        CurrencyCode::Rub,
        CurrencyCode::Usdt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Uah => "UAH",
            CurrencyCode::Rub => "RUB",
            CurrencyCode::Usdt => "USDT",
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| UnknownCurrency(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" Usdt ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usdt);
        assert_eq!("RUB".parse::<CurrencyCode>().unwrap(), CurrencyCode::Rub);
    }

    #[test]
    fn test_parse_unknown_currency() {
        let err = "gbp".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported currency: gbp");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.to_string().parse::<CurrencyCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_serde_uses_uppercase_codes() {
        let json = serde_json::to_string(&CurrencyCode::Usdt).unwrap();
        assert_eq!(json, "\"USDT\"");
    }
}
