use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{fetch_body, http_client, parse_rate};
use crate::core::error::FetchError;
use crate::core::{CurrencyCode, RateFact, RateFeed, Snapshot};

pub const SOURCE: &str = "CBR";

/// Official Central Bank of Russia daily rates, RUB per 1 unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CbrSnapshot {
    pub eur_rub: f64,
    pub usd_rub: f64,
    pub as_of: DateTime<Utc>,
}

impl Snapshot for CbrSnapshot {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn facts(&self) -> Vec<RateFact> {
        vec![
            RateFact::new(CurrencyCode::Eur, CurrencyCode::Rub, self.eur_rub),
            RateFact::new(CurrencyCode::Usd, CurrencyCode::Rub, self.usd_rub),
        ]
    }

    fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }
}

pub struct CbrProvider {
    base_url: String,
    timeout: Duration,
}

impl CbrProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        CbrProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Nominal", default)]
    nominal: Option<String>,
    #[serde(rename = "Value")]
    value: String,
}

impl ValCurs {
    /// Rate per single unit; quotes are published per `Nominal` units.
    fn rate(&self, code: &str) -> Result<f64, FetchError> {
        let valute = self
            .valutes
            .iter()
            .find(|v| v.char_code.trim() == code)
            .ok_or_else(|| FetchError::MissingRate {
                provider: SOURCE,
                code: code.to_string(),
            })?;

        let nominal = match valute.nominal.as_deref() {
            Some(raw) => parse_rate(SOURCE, code, raw)?,
            None => 1.0,
        };
        let value = parse_rate(SOURCE, code, &valute.value)?;
        Ok(value / nominal)
    }
}

fn parse_daily(body: &[u8]) -> Result<ValCurs, FetchError> {
    // Feed is windows-1251; only the ASCII fields are read so lossy decoding is enough.
    let text = String::from_utf8_lossy(body);
    quick_xml::de::from_str(&text).map_err(|e| FetchError::Malformed {
        provider: SOURCE,
        message: e.to_string(),
    })
}

#[async_trait]
impl RateFeed for CbrProvider {
    type Output = CbrSnapshot;

    #[instrument(name = "CbrFetch", skip(self))]
    async fn fetch(&self) -> Result<CbrSnapshot, FetchError> {
        let url = format!("{}/scripts/XML_daily.asp", self.base_url);
        let client = http_client(SOURCE, self.timeout)?;
        let body = fetch_body(&client, SOURCE, &url).await?;

        let daily = parse_daily(&body)?;
        let snapshot = CbrSnapshot {
            eur_rub: daily.rate("EUR")?,
            usd_rub: daily.rate("USD")?,
            as_of: Utc::now(),
        };
        debug!(?snapshot, "Parsed CBR snapshot");
        Ok(snapshot)
    }
}
