use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{fetch_body, http_client, parse_rate};
use crate::core::error::FetchError;
use crate::core::{CurrencyCode, RateFact, RateFeed, Snapshot};

pub const SOURCE: &str = "Binance";

/// Binance spot prices for the USDT crosses.
#[derive(Debug, Clone, PartialEq)]
pub struct BinanceSnapshot {
    /// USDT per 1 EUR (EURUSDT)
    pub eur_usdt: f64,
    /// UAH per 1 USDT (USDTUAH)
    pub usdt_uah: f64,
    /// USD per 1 USDT (USDTUSD)
    pub usdt_usd: f64,
    pub as_of: DateTime<Utc>,
}

impl Snapshot for BinanceSnapshot {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn facts(&self) -> Vec<RateFact> {
        vec![
            RateFact::new(CurrencyCode::Eur, CurrencyCode::Usdt, self.eur_usdt),
            RateFact::new(CurrencyCode::Usdt, CurrencyCode::Uah, self.usdt_uah),
            RateFact::new(CurrencyCode::Usdt, CurrencyCode::Usd, self.usdt_usd),
        ]
    }

    fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }
}

pub struct BinanceProvider {
    base_url: String,
    timeout: Duration,
}

impl BinanceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        BinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn price(&self, client: &reqwest::Client, symbol: &str) -> Result<f64, FetchError> {
        let url = format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol);
        let body = fetch_body(client, SOURCE, &url).await?;

        let ticker: TickerPrice =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
                provider: SOURCE,
                message: format!("{symbol}: {e}"),
            })?;

        if !ticker.symbol.eq_ignore_ascii_case(symbol) {
            return Err(FetchError::MissingRate {
                provider: SOURCE,
                code: symbol.to_string(),
            });
        }
        parse_rate(SOURCE, symbol, &ticker.price)
    }
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

#[async_trait]
impl RateFeed for BinanceProvider {
    type Output = BinanceSnapshot;

    #[instrument(name = "BinanceFetch", skip(self))]
    async fn fetch(&self) -> Result<BinanceSnapshot, FetchError> {
        let client = http_client(SOURCE, self.timeout)?;

        // One symbol per request, issued in order
        let eur_usdt = self.price(&client, "EURUSDT").await?;
        let usdt_uah = self.price(&client, "USDTUAH").await?;
        let usdt_usd = self.price(&client, "USDTUSD").await?;

        let snapshot = BinanceSnapshot {
            eur_usdt,
            usdt_uah,
            usdt_usd,
            as_of: Utc::now(),
        };
        debug!(?snapshot, "Parsed Binance snapshot");
        Ok(snapshot)
    }
}
