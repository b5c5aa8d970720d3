//! Give/get amount calculation on top of a resolved rate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::currency::CurrencyCode;
use super::rate::RateResult;

/// Which side of the exchange the entered amount refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountMode {
    Give,
    Get,
}

impl Display for AmountMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AmountMode::Give => "give",
                AmountMode::Get => "get",
            }
        )
    }
}

impl FromStr for AmountMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "give" => Ok(AmountMode::Give),
            "get" => Ok(AmountMode::Get),
            _ => Err(anyhow::anyhow!("Invalid amount mode: {}", s)),
        }
    }
}

/// Parses user input like `1 500,50`. Only finite positive amounts are accepted.
pub fn parse_amount(text: &str) -> Option<f64> {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub give: CurrencyCode,
    pub get: CurrencyCode,
    pub mode: AmountMode,
    pub amount: f64,
    /// Rate rounded to 3 decimals, for display and storage.
    pub rate: f64,
    pub give_amount: i64,
    pub get_amount: i64,
    pub sources: String,
    pub as_of: DateTime<Utc>,
}

impl Quote {
    /// Amounts are computed with the unrounded rate, then rounded to whole units.
    pub fn new(
        give: CurrencyCode,
        get: CurrencyCode,
        mode: AmountMode,
        amount: f64,
        result: &RateResult,
    ) -> Self {
        let (give_raw, get_raw) = match mode {
            AmountMode::Give => (amount, amount * result.rate),
            AmountMode::Get => (amount / result.rate, amount),
        };

        Quote {
            give,
            get,
            mode,
            amount,
            rate: (result.rate * 1000.0).round() / 1000.0,
            give_amount: give_raw.round() as i64,
            get_amount: get_raw.round() as i64,
            sources: result.sources_text(),
            as_of: result.as_of,
        }
    }
}
