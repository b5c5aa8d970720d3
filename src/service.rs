//! Rate resolution facade: cache first, otherwise fetch every feed, build the
//! graph and search it.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::core::cache::pair_key;
use crate::core::config::AppConfig;
use crate::core::graph::RateGraph;
use crate::core::resolver::find_path;
use crate::core::{CurrencyCode, RateCache, RateError, RateFeed, RateResolver, RateResult, Snapshot};
use crate::providers::{BinanceProvider, CbrProvider, NbuProvider};

pub struct RateService<C, N, B> {
    cbr: C,
    nbu: N,
    binance: B,
    cache: Arc<RateCache>,
    ttl: Duration,
}

pub type LiveRateService = RateService<CbrProvider, NbuProvider, BinanceProvider>;

impl<C, N, B> RateService<C, N, B>
where
    C: RateFeed,
    N: RateFeed,
    B: RateFeed,
{
    pub fn new(cbr: C, nbu: N, binance: B, cache: Arc<RateCache>, ttl: Duration) -> Self {
        Self {
            cbr,
            nbu,
            binance,
            cache,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Any feed failure aborts the whole resolution.
    async fn refresh(&self, from: CurrencyCode, to: CurrencyCode) -> Result<RateResult, RateError> {
        let cbr = self.cbr.fetch().await?;
        let nbu = self.nbu.fetch().await?;
        let binance = self.binance.fetch().await?;

        let snapshots: [&dyn Snapshot; 3] = [&cbr, &nbu, &binance];
        let graph = RateGraph::build(&snapshots);
        let (rate, path) = find_path(&graph, from, to)?;
        let as_of = snapshots
            .iter()
            .map(|snapshot| snapshot.as_of())
            .max()
            .unwrap_or_else(Utc::now);

        Ok(RateResult { rate, path, as_of })
    }
}

impl LiveRateService {
    pub fn from_config(config: &AppConfig, cache: Arc<RateCache>) -> Self {
        let timeout = config.rates.timeout();
        RateService::new(
            CbrProvider::new(config.providers.cbr_url(), timeout),
            NbuProvider::new(config.providers.nbu_url(), timeout),
            BinanceProvider::new(config.providers.binance_url(), timeout),
            cache,
            config.rates.ttl(),
        )
    }
}

#[async_trait]
impl<C, N, B> RateResolver for RateService<C, N, B>
where
    C: RateFeed,
    N: RateFeed,
    B: RateFeed,
{
    #[instrument(name = "ResolveRate", skip(self))]
    async fn resolve(&self, from: CurrencyCode, to: CurrencyCode) -> Result<RateResult, RateError> {
        if from == to {
            return Ok(RateResult::identity(Utc::now()));
        }

        let key = pair_key(from, to);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let result = self
            .refresh(from, to)
            .await
            .inspect_err(|e| warn!("Rate resolution failed: {}", e))?;
        info!(
            rate = result.rate,
            hops = result.path.len(),
            "Resolved {} via {}",
            key,
            result.sources_text()
        );
        self.cache.put(key, result.clone(), self.ttl).await;
        Ok(result)
    }
}
