//! Rate abstractions and core types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;
use super::error::{FetchError, RateError};

/// One quoted pair: `rate` units of `quote` per 1 unit of `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateFact {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
    pub rate: f64,
}

impl RateFact {
    pub fn new(base: CurrencyCode, quote: CurrencyCode, rate: f64) -> Self {
        Self { base, quote, rate }
    }
}

/// Read-only view over a provider snapshot, consumed by the graph builder.
pub trait Snapshot: Send + Sync {
    /// Label attached to every edge derived from this snapshot.
    fn source(&self) -> &'static str;

    /// Quoted pairs in a stable order.
    fn facts(&self) -> Vec<RateFact>;

    /// Retrieval timestamp.
    fn as_of(&self) -> DateTime<Utc>;
}

/// An upstream feed producing one fixed snapshot shape per fetch.
#[async_trait]
pub trait RateFeed: Send + Sync {
    type Output: Snapshot + 'static;

    async fn fetch(&self) -> Result<Self::Output, FetchError>;
}

/// Answers "how many units of `to` per 1 unit of `from`".
#[async_trait]
pub trait RateResolver: Send + Sync {
    async fn resolve(&self, from: CurrencyCode, to: CurrencyCode) -> Result<RateResult, RateError>;
}

/// A single conversion step of a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub source: String,
}

pub type ConversionPath = Vec<Hop>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResult {
    pub rate: f64,
    pub path: ConversionPath,
    pub as_of: DateTime<Utc>,
}

impl RateResult {
    pub fn identity(as_of: DateTime<Utc>) -> Self {
        Self {
            rate: 1.0,
            path: Vec::new(),
            as_of,
        }
    }

    /// Renders the path as `A->B(SRC) | B->C(SRC)`; empty for identity.
    pub fn sources_text(&self) -> String {
        self.path
            .iter()
            .map(|hop| format!("{}->{}({})", hop.from, hop.to, hop.source))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
