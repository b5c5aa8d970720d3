//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod flow;
pub mod graph;
pub mod log;
pub mod quote;
pub mod rate;
pub mod resolver;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use currency::CurrencyCode;
pub use error::{FetchError, RateError};
pub use flow::{ExchangeFlow, FlowError, FlowState, OrderSummary};
pub use quote::{AmountMode, Quote};
pub use rate::{ConversionPath, Hop, RateFact, RateFeed, RateResolver, RateResult, Snapshot};
